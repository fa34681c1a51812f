//! # 简历照片裁剪工具 — 命令行入口
//!
//! 本文件仅负责参数解析与一次完整的“上传 → 拖动 → 确认”流程，
//! 业务逻辑分布在 `photo` 模块中，详见 `lib.rs` 架构文档。
//!
//! ```text
//! resume-photo <input> [--container WxH] [--drag DX,DY] [--rendered WxH]
//!              [--settings PATH] [--output PATH]
//! ```

use std::fs;
use std::path::PathBuf;

use resume_photo::error::AppError;
use resume_photo::photo::{CandidateFile, Notice, NoticeLevel, PhotoService, PhotoSink, Point, Size};
use resume_photo::settings;

const USAGE: &str = "用法: resume-photo <input> [--container WxH] [--drag DX,DY] \
                     [--rendered WxH] [--settings PATH] [--output PATH]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    container: Size,
    drag: Point,
    rendered: Option<Size>,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_pair(value: &str, separator: char, flag: &str) -> Result<(f64, f64), AppError> {
    let invalid = || AppError::Usage(format!("{} 参数格式错误: {}", flag, value));
    let (a, b) = value.split_once(separator).ok_or_else(invalid)?;
    let a = a.trim().parse::<f64>().map_err(|_| invalid())?;
    let b = b.trim().parse::<f64>().map_err(|_| invalid())?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(invalid());
    }
    Ok((a, b))
}

fn parse_size(value: &str, flag: &str) -> Result<Size, AppError> {
    let (width, height) = parse_pair(&value.to_ascii_lowercase(), 'x', flag)?;
    Ok(Size::new(width, height))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, AppError> {
    let mut input = None;
    let mut parsed = CliArgs {
        input: PathBuf::new(),
        container: Size::new(400.0, 400.0),
        drag: Point::new(0.0, 0.0),
        rendered: None,
        settings: None,
        output: None,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| AppError::Usage(format!("{} 缺少参数值", flag)))
        };

        match arg.as_str() {
            "--container" => parsed.container = parse_size(&value("--container")?, "--container")?,
            "--rendered" => {
                parsed.rendered = Some(parse_size(&value("--rendered")?, "--rendered")?);
            }
            "--drag" => {
                let (dx, dy) = parse_pair(&value("--drag")?, ',', "--drag")?;
                parsed.drag = Point::new(dx, dy);
            }
            "--settings" => parsed.settings = Some(PathBuf::from(value("--settings")?)),
            "--output" => parsed.output = Some(PathBuf::from(value("--output")?)),
            flag if flag.starts_with("--") => {
                return Err(AppError::Usage(format!("未知参数: {}\n{}", flag, USAGE)));
            }
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => return Err(AppError::Usage(format!("多余的参数: {}\n{}", extra, USAGE))),
        }
    }

    parsed.input = input.ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
    Ok(parsed)
}

/// 命令行下的回调：提示写日志，照片变更只记录长度。
struct ConsoleSink;

impl PhotoSink for ConsoleSink {
    fn on_change(&mut self, photo: &str) {
        log::debug!("photo changed: {} chars", photo.len());
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => log::info!("{}", notice.message),
            NoticeLevel::Error => log::error!("{}", notice.message),
        }
    }
}

async fn run(args: CliArgs) -> Result<(), AppError> {
    let config = match &args.settings {
        Some(path) => settings::load_settings(path)?,
        None => Default::default(),
    };
    let service = PhotoService::with_config(config)?;

    let bytes = fs::read(&args.input)?;
    let mime_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    let candidate = CandidateFile::new(mime_type, bytes);

    let mut uploader = service.uploader("", ConsoleSink)?;
    service.upload(&mut uploader, candidate, args.container).await?;

    if let Some(selection) = uploader.selection() {
        let center = Point::new(
            selection.x + selection.width / 2.0,
            selection.y + selection.height / 2.0,
        );
        uploader.press(center);
        uploader.drag_to(Point::new(center.x + args.drag.x, center.y + args.drag.y));
        uploader.release();
    }

    let output = uploader
        .confirm(args.rendered)?
        .ok_or_else(|| AppError::Usage("没有可确认的裁剪".to_string()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, output.to_bytes()?)?;
            log::info!("✅ 已写入 {}（{}x{}）", path.display(), output.width, output.height);
        }
        None => println!("{}", output.data_url),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match parse_args(std::env::args().skip(1)) {
        Ok(args) => run(args).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        log::error!("处理失败: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
