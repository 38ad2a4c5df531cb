// 该文件是 Shuguo （熟果） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use shuguo::{
  FromUrl,
  evaluate::FailurePolicy,
  input::ImageFileInput,
  model::RipenessModel,
  task::{EvaluateTask, OneShotTask, Task},
};

use args::{Args, Command};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  match args.command {
    Command::Classify {
      input,
      fruit,
      debug_crop,
    } => {
      info!("输入来源: {}", input);
      info!("水果种类: {}", fruit);

      let input_image = ImageFileInput::from_url(&input)?;
      let model = RipenessModel::default();
      let estimate = OneShotTask::new(fruit).run_task(input_image, model, crop_output(debug_crop))?;

      println!("{}", estimate.label);
    }
    Command::Evaluate {
      root,
      limit,
      skip_errors,
      record,
    } => {
      info!("数据集目录: {}", root.display());

      let policy = if skip_errors {
        FailurePolicy::Skip
      } else {
        FailurePolicy::Abort
      };
      let output = record_output(record.as_ref())?;
      let accuracy = EvaluateTask::default()
        .with_limit(limit)
        .with_policy(policy)
        .run_task(root, RipenessModel::default(), output)?;

      println!("Accuracy: {:.2}%", accuracy);
    }
  }

  Ok(())
}

#[cfg(feature = "save_image_file")]
fn crop_output(enabled: bool) -> Option<shuguo::output::SaveImageFileOutput> {
  enabled.then(|| shuguo::output::SaveImageFileOutput::new(shuguo::output::DEBUG_CROP_FILENAME))
}

#[cfg(not(feature = "save_image_file"))]
fn crop_output(enabled: bool) -> Option<NoOutput> {
  if enabled {
    tracing::warn!("未启用 save_image_file 特性，忽略 --debug-crop");
  }
  None
}

#[cfg(feature = "directory_record")]
fn record_output(url: Option<&url::Url>) -> Result<Option<shuguo::output::EvaluationRecordOutput>> {
  Ok(
    url
      .map(shuguo::output::EvaluationRecordOutput::from_url)
      .transpose()?,
  )
}

#[cfg(not(feature = "directory_record"))]
fn record_output(url: Option<&url::Url>) -> Result<Option<NoOutput>> {
  if url.is_some() {
    tracing::warn!("未启用 directory_record 特性，忽略 --record");
  }
  Ok(None)
}

/// 特性关闭时的占位输出
#[cfg(any(not(feature = "save_image_file"), not(feature = "directory_record")))]
struct NoOutput;

#[cfg(any(not(feature = "save_image_file"), not(feature = "directory_record")))]
impl<Frame, Output> shuguo::output::Render<Frame, Output> for NoOutput {
  type Error = std::convert::Infallible;

  fn render_result(&self, _frame: &Frame, _result: &Output) -> Result<(), Self::Error> {
    Ok(())
  }
}
