// 该文件是 Shuguo （熟果） 项目的一部分。
// src/model/ripeness.rs - 分割、取色、分类串联的成熟度估计
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

use image::{Rgb, RgbImage};
use tracing::{debug, info};

use crate::{
  color::{ColorReducer, ColorReducerConfig},
  model::{Classifier, ClassifyError, Model, ReferenceTable, RipenessLabel},
  segment::{Segmenter, SegmenterConfig},
};

/// 单张待估计的样本
#[derive(Debug, Clone)]
pub struct Sample {
  pub image: RgbImage,
  pub fruit: String,
}

/// 估计结果
#[derive(Debug, Clone)]
pub struct Estimate {
  /// 分割后的图像
  pub crop: RgbImage,
  /// 代表色
  pub color: Rgb<u8>,
  /// 成熟度
  pub label: RipenessLabel,
}

pub struct RipenessModel {
  segmenter: Segmenter,
  reducer: ColorReducer,
  classifier: Classifier,
}

#[derive(Debug, Clone, Default)]
pub struct RipenessModelBuilder {
  segmenter: SegmenterConfig,
  color: ColorReducerConfig,
  references: Option<ReferenceTable>,
}

impl RipenessModelBuilder {
  pub fn segmenter(mut self, config: SegmenterConfig) -> Self {
    self.segmenter = config;
    self
  }

  pub fn color(mut self, config: ColorReducerConfig) -> Self {
    self.color = config;
    self
  }

  pub fn references(mut self, table: ReferenceTable) -> Self {
    self.references = Some(table);
    self
  }

  pub fn build(self) -> RipenessModel {
    let table = self.references.unwrap_or_else(ReferenceTable::builtin);
    debug!("参考色表包含 {} 种水果", table.len());
    RipenessModel {
      segmenter: Segmenter::new(self.segmenter),
      reducer: ColorReducer::new(self.color),
      classifier: Classifier::new(table),
    }
  }
}

impl Default for RipenessModel {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl RipenessModel {
  pub fn builder() -> RipenessModelBuilder {
    RipenessModelBuilder::default()
  }

  pub fn segmenter(&self) -> &Segmenter {
    &self.segmenter
  }

  pub fn reducer(&self) -> &ColorReducer {
    &self.reducer
  }

  pub fn classifier(&self) -> &Classifier {
    &self.classifier
  }

  /// 分割 → 取色 → 分类
  pub fn estimate(&self, image: &RgbImage, fruit: &str) -> Result<Estimate, ClassifyError> {
    let crop = self.segmenter.crop(image);
    debug!(
      "裁剪结果: {}x{} -> {}x{}",
      image.width(),
      image.height(),
      crop.width(),
      crop.height()
    );
    let color = self.reducer.average_color(&crop);
    let label = self.classifier.classify(color, fruit)?;
    info!("{}: 代表色 {:?}，成熟度 {}", fruit, color.0, label);

    Ok(Estimate { crop, color, label })
  }
}

impl Model for RipenessModel {
  type Input = Sample;
  type Output = Estimate;
  type Error = ClassifyError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    self.estimate(&input.image, &input.fruit)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::ImageBuffer;

  #[test]
  fn test_estimate_on_synthetic_fruit() {
    // 浅色背景上的红色番茄块
    let image = ImageBuffer::from_fn(120, 100, |x, y| {
      if (30..90).contains(&x) && (20..80).contains(&y) {
        Rgb([198u8, 40, 34])
      } else {
        Rgb([235u8, 235, 235])
      }
    });

    let model = RipenessModel::default();
    let estimate = model
      .infer(&Sample {
        image,
        fruit: "Tomato".to_string(),
      })
      .expect("应当成功估计");

    assert!((estimate.crop.width() as i32 - 60).abs() <= 1);
    assert!((estimate.crop.height() as i32 - 60).abs() <= 1);
    assert_eq!(estimate.label, RipenessLabel::Ripe);
  }

  #[test]
  fn test_unknown_fruit_propagates() {
    let image = RgbImage::new(10, 10);
    let model = RipenessModel::default();
    assert!(matches!(
      model.estimate(&image, "kiwi"),
      Err(ClassifyError::UnknownFruit(_))
    ));
  }

  #[test]
  fn test_builder_uses_injected_table() {
    let table = ReferenceTable::new().with_fruit("kiwi", [[0, 0, 0], [1, 1, 1], [2, 2, 2], [3, 3, 3]]);
    let model = RipenessModel::builder().references(table).build();
    let estimate = model
      .estimate(&RgbImage::new(10, 10), "kiwi")
      .expect("应当成功估计");
    assert_eq!(estimate.color, Rgb([0, 0, 0]));
    assert_eq!(estimate.label, RipenessLabel::Unripe);
  }
}
