// 该文件是 Shuguo （熟果） 项目的一部分。
// src/task.rs - 任务
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

use std::path::PathBuf;

use image::RgbImage;
use tracing::{info, warn};

use crate::{
  evaluate::{BatchEvaluator, EvaluationReport, FailurePolicy},
  model::{Estimate, Model, RipenessModel, Sample},
  output::Render,
};

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 单张图像估计
pub struct OneShotTask {
  fruit: String,
}

impl OneShotTask {
  pub fn new(fruit: impl Into<String>) -> Self {
    Self {
      fruit: fruit.into(),
    }
  }
}

impl<
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = RgbImage>,
  M: Model<Input = Sample, Output = Estimate, Error = ME>,
  O: Render<Sample, Estimate, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Output = Estimate;
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, model: M, output: O) -> Result<Self::Output, Self::Error> {
    info!("开始任务...");
    let image = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功: {}x{}，开始估计...", image.width(), image.height());

    let sample = Sample {
      image,
      fruit: self.fruit,
    };
    let now = std::time::Instant::now();
    let estimate = model.infer(&sample)?;
    let elapsed = now.elapsed();
    info!(
      "估计完成，耗时: {:.2?}，裁剪尺寸: {}x{}，代表色: {:?}",
      elapsed,
      estimate.crop.width(),
      estimate.crop.height(),
      estimate.color.0
    );
    output.render_result(&sample, &estimate)?;

    Ok(estimate)
  }
}

/// 数据集批量评估
#[derive(Debug, Default)]
pub struct EvaluateTask {
  limit: Option<usize>,
  policy: FailurePolicy,
}

impl EvaluateTask {
  pub fn with_limit(mut self, limit: Option<usize>) -> Self {
    self.limit = limit;
    self
  }

  pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }
}

impl<RE: std::error::Error + Sync + Send + 'static, O: Render<PathBuf, EvaluationReport, Error = RE>>
  Task<PathBuf, RipenessModel, O> for EvaluateTask
{
  type Output = f64;
  type Error = anyhow::Error;

  fn run_task(self, input: PathBuf, model: RipenessModel, output: O) -> Result<f64, Self::Error> {
    info!("开始评估: {}", input.display());
    if let Some(limit) = self.limit {
      warn!("测试模式：每个成熟度目录最多评估 {} 个文件", limit);
    }

    let now = std::time::Instant::now();
    let report = BatchEvaluator::new(model)
      .with_limit(self.limit)
      .with_policy(self.policy)
      .run(&input)?;
    info!(
      "评估完成，耗时: {:.2?}，处理 {} 个，跳过 {} 个",
      now.elapsed(),
      report.result.total_images,
      report.skipped
    );

    output.render_result(&input, &report)?;
    Ok(report.accuracy()?)
  }
}
