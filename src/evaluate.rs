// 该文件是 Shuguo （熟果） 项目的一部分。
// src/evaluate.rs - 批量评估
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

use std::path::Path;

use image::Rgb;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
  dataset::{DatasetError, DatasetSchema, LabeledImage},
  input::{ImageFileInputError, load_rgb_image},
  model::{ClassifyError, RipenessLabel, RipenessModel},
};

#[derive(Error, Debug)]
pub enum EvaluateError {
  #[error("没有处理任何图像，无法计算准确率")]
  NoImagesProcessed,
  #[error("数据集错误: {0}")]
  Dataset(#[from] DatasetError),
  #[error("图像输入错误: {0}")]
  Input(#[from] ImageFileInputError),
  #[error("分类错误: {0}")]
  Classify(#[from] ClassifyError),
}

/// 单个文件出错时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
  /// 立即终止整个评估
  #[default]
  Abort,
  /// 记录警告并跳过该文件，跳过的文件不计入总数
  Skip,
}

/// 部分得分：完全一致得 1 分，相差一个阶段得 0.5 分，其余 0 分
pub fn score(truth: RipenessLabel, predicted: RipenessLabel) -> f64 {
  match truth.steps_to(predicted) {
    0 => 1.0,
    1 => 0.5,
    _ => 0.0,
  }
}

/// 评估累计结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationResult {
  pub total_images: usize,
  pub correct_score: f64,
  // confusion[真实][预测]
  confusion: [[usize; 4]; 4],
}

impl EvaluationResult {
  pub fn new() -> Self {
    Self::default()
  }

  /// 记录一次预测，返回本次得分
  pub fn record(&mut self, truth: RipenessLabel, predicted: RipenessLabel) -> f64 {
    let gained = score(truth, predicted);
    self.total_images += 1;
    self.correct_score += gained;
    self.confusion[truth.ordinal()][predicted.ordinal()] += 1;
    gained
  }

  /// 准确率百分比
  pub fn accuracy(&self) -> Result<f64, EvaluateError> {
    if self.total_images == 0 {
      return Err(EvaluateError::NoImagesProcessed);
    }
    Ok(self.correct_score / self.total_images as f64 * 100.0)
  }

  pub fn confusion(&self) -> &[[usize; 4]; 4] {
    &self.confusion
  }
}

/// 单个文件的评估结果
#[derive(Debug, Clone)]
pub struct ImageOutcome {
  pub image: LabeledImage,
  pub color: Rgb<u8>,
  pub predicted: RipenessLabel,
  pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
  pub result: EvaluationResult,
  pub outcomes: Vec<ImageOutcome>,
  pub skipped: usize,
}

impl EvaluationReport {
  pub fn accuracy(&self) -> Result<f64, EvaluateError> {
    self.result.accuracy()
  }
}

/// 批量评估器
pub struct BatchEvaluator {
  model: RipenessModel,
  schema: DatasetSchema,
  policy: FailurePolicy,
}

impl BatchEvaluator {
  pub fn new(model: RipenessModel) -> Self {
    Self {
      model,
      schema: DatasetSchema::default(),
      policy: FailurePolicy::default(),
    }
  }

  pub fn with_limit(mut self, limit: Option<usize>) -> Self {
    self.schema = self.schema.with_limit(limit);
    self
  }

  pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// 评估数据集并返回准确率百分比
  pub fn evaluate<P: AsRef<Path>>(&self, root: P) -> Result<f64, EvaluateError> {
    self.run(root)?.accuracy()
  }

  /// 扫描并评估数据集，返回完整报告
  pub fn run<P: AsRef<Path>>(&self, root: P) -> Result<EvaluationReport, EvaluateError> {
    let images = self.schema.scan(root)?;
    self.evaluate_images(images)
  }

  pub fn evaluate_images(
    &self,
    images: Vec<LabeledImage>,
  ) -> Result<EvaluationReport, EvaluateError> {
    let mut report = EvaluationReport::default();
    let total = images.len();

    for (index, image) in images.into_iter().enumerate() {
      info!("[{}/{}] 处理 {}", index + 1, total, image.path.display());
      match self.process(&image) {
        Ok((color, predicted)) => {
          let gained = report.result.record(image.truth, predicted);
          info!(
            "真实: {}，预测: {}，得分: {}",
            image.truth, predicted, gained
          );
          report.outcomes.push(ImageOutcome {
            image,
            color,
            predicted,
            score: gained,
          });
        }
        Err(e) if self.policy == FailurePolicy::Skip => {
          warn!("跳过 {}: {}", image.path.display(), e);
          report.skipped += 1;
        }
        Err(e) => return Err(e),
      }
    }

    log_confusion(&report.result);
    Ok(report)
  }

  fn process(&self, image: &LabeledImage) -> Result<(Rgb<u8>, RipenessLabel), EvaluateError> {
    let rgb = load_rgb_image(&image.path)?;
    let estimate = self.model.estimate(&rgb, &image.fruit)?;
    Ok((estimate.color, estimate.label))
  }
}

fn log_confusion(result: &EvaluationResult) {
  info!(
    "共处理 {} 张图像，得分 {:.1}",
    result.total_images, result.correct_score
  );
  for truth in RipenessLabel::ALL {
    info!(
      "{:>10} -> {:?}",
      truth.as_str(),
      result.confusion()[truth.ordinal()]
    );
  }
}
