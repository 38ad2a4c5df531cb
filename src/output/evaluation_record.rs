// 该文件是 Shuguo （熟果） 项目的一部分。
// src/output/evaluation_record.rs - 评估记录输出
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

//! 评估记录输出
//!
//! 以 `folder:///path/to/records` 指定记录目录，每次评估在
//! `<目录>/<年>/<月>/<日>/<时-分-秒>-evaluation.json` 写入一份报告，
//! 包含每张图像的真实标签、预测标签、代表色与得分。

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

use crate::{
  FromUrl, FromUrlWithScheme,
  evaluate::{EvaluationReport, ImageOutcome},
  output::Render,
};

#[derive(Error, Debug)]
pub enum EvaluationRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

pub struct EvaluationRecordOutput {
  directory: PathBuf,
}

impl FromUrlWithScheme for EvaluationRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for EvaluationRecordOutput {
  type Error = EvaluationRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(EvaluationRecordOutputError::SchemeMismatch);
    }

    Ok(EvaluationRecordOutput::new(uri.path()))
  }
}

fn outcome_to_json(outcome: &ImageOutcome) -> Value {
  json!({
    "path": outcome.image.path.display().to_string(),
    "fruit": outcome.image.fruit,
    "truth": outcome.image.truth.as_str(),
    "predicted": outcome.predicted.as_str(),
    "color": outcome.color.0,
    "score": outcome.score,
  })
}

impl EvaluationRecordOutput {
  pub fn new<P: AsRef<Path>>(directory: P) -> Self {
    EvaluationRecordOutput {
      directory: directory.as_ref().to_path_buf(),
    }
  }

  fn report_path(&self) -> Result<PathBuf, EvaluationRecordOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!("{}-evaluation.json", now.format("%H-%M-%S"))))
  }

  /// 写入评估报告，返回报告文件路径
  pub fn write_report(
    &self,
    root: &Path,
    report: &EvaluationReport,
  ) -> Result<PathBuf, EvaluationRecordOutputError> {
    let path = self.report_path()?;
    let document = json!({
      "root": root.display().to_string(),
      "total_images": report.result.total_images,
      "correct_score": report.result.correct_score,
      "skipped": report.skipped,
      "accuracy": report.accuracy().ok(),
      "confusion": report.result.confusion(),
      "records": report.outcomes.iter().map(outcome_to_json).collect::<Vec<_>>(),
    });

    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    info!("评估记录已写入: {}", path.display());
    Ok(path)
  }
}

impl Render<PathBuf, EvaluationReport> for EvaluationRecordOutput {
  type Error = EvaluationRecordOutputError;

  fn render_result(&self, frame: &PathBuf, result: &EvaluationReport) -> Result<(), Self::Error> {
    self.write_report(frame, result).map(|_| ())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    dataset::LabeledImage,
    evaluate::EvaluationResult,
    model::RipenessLabel,
  };
  use image::Rgb;
  use tempfile::tempdir;

  #[test]
  fn test_write_report() {
    let dir = tempdir().unwrap();
    let output = EvaluationRecordOutput::new(dir.path());

    let mut result = EvaluationResult::new();
    let gained = result.record(RipenessLabel::Ripe, RipenessLabel::Overripe);
    let report = EvaluationReport {
      result,
      outcomes: vec![ImageOutcome {
        image: LabeledImage {
          path: PathBuf::from("Mango/2/a.jpg"),
          fruit: "mango".to_string(),
          truth: RipenessLabel::Ripe,
        },
        color: Rgb([160, 90, 40]),
        predicted: RipenessLabel::Overripe,
        score: gained,
      }],
      skipped: 1,
    };

    let path = output.write_report(Path::new("/data"), &report).unwrap();
    assert!(path.starts_with(dir.path()));

    let text = std::fs::read_to_string(&path).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["total_images"], 1);
    assert_eq!(value["skipped"], 1);
    assert_eq!(value["accuracy"], 50.0);
    assert_eq!(value["records"][0]["truth"], "Ripe");
    assert_eq!(value["records"][0]["predicted"], "Overripe");
    assert_eq!(value["records"][0]["color"], json!([160, 90, 40]));
    assert_eq!(value["confusion"][2][3], 1);
  }

  #[test]
  fn test_empty_report_has_null_accuracy() {
    let dir = tempdir().unwrap();
    let output = EvaluationRecordOutput::new(dir.path());
    let path = output
      .write_report(Path::new("/data"), &EvaluationReport::default())
      .unwrap();

    let value: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert!(value["accuracy"].is_null());
  }

  #[test]
  fn test_scheme_mismatch() {
    let url = url::Url::parse("image:///tmp/records").unwrap();
    assert!(matches!(
      EvaluationRecordOutput::from_url(&url),
      Err(EvaluationRecordOutputError::SchemeMismatch)
    ));
  }
}
