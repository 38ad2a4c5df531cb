// 该文件是 Shuguo （熟果） 项目的一部分。
// src/model/classifier.rs - 最近参考色分类
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

use image::Rgb;
use thiserror::Error;
use tracing::{debug, error};

use crate::model::{ReferenceTable, RipenessLabel};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
  #[error("未知的水果种类: {0}")]
  UnknownFruit(String),
}

/// 最近参考色分类器
#[derive(Debug, Clone)]
pub struct Classifier {
  table: ReferenceTable,
}

impl Default for Classifier {
  fn default() -> Self {
    Self::new(ReferenceTable::builtin())
  }
}

fn euclidean(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
  a.0
    .iter()
    .zip(b.0.iter())
    .map(|(x, y)| {
      let d = *x as f64 - *y as f64;
      d * d
    })
    .sum::<f64>()
    .sqrt()
}

impl Classifier {
  pub fn new(table: ReferenceTable) -> Self {
    Self { table }
  }

  pub fn table(&self) -> &ReferenceTable {
    &self.table
  }

  /// 到四个参考色的 RGB 欧氏距离，按标签顺序排列
  pub fn distances(&self, color: Rgb<u8>, fruit: &str) -> Result<[f64; 4], ClassifyError> {
    let references = self.table.get(fruit).ok_or_else(|| {
      error!("参考色表中没有水果: {}", fruit);
      ClassifyError::UnknownFruit(fruit.to_string())
    })?;
    Ok(references.map(|reference| euclidean(color, reference)))
  }

  /// 返回距离最近的成熟度标签，距离相同时取顺序靠前者
  pub fn classify(&self, color: Rgb<u8>, fruit: &str) -> Result<RipenessLabel, ClassifyError> {
    let distances = self.distances(color, fruit)?;

    let mut best = RipenessLabel::Unripe;
    let mut best_distance = f64::INFINITY;
    for (label, distance) in RipenessLabel::ALL.into_iter().zip(distances) {
      if distance < best_distance {
        best = label;
        best_distance = distance;
      }
    }

    debug!(
      "{} 颜色 {:?} 的距离: {:.2?} -> {}",
      fruit, color.0, distances, best
    );
    Ok(best)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reference_colors_classify_to_their_own_label() {
    let classifier = Classifier::default();
    let fruits: Vec<String> = classifier.table().fruits().map(str::to_string).collect();
    for fruit in fruits {
      for label in RipenessLabel::ALL {
        let color = classifier
          .table()
          .reference_color(&fruit, label)
          .expect("参考色应当存在");
        assert_eq!(classifier.classify(color, &fruit), Ok(label), "{} {}", fruit, label);
      }
    }
  }

  #[test]
  fn test_tie_breaks_to_lower_ordinal() {
    let table = ReferenceTable::new().with_fruit(
      "test",
      [[0, 0, 0], [10, 0, 0], [200, 200, 200], [250, 250, 250]],
    );
    let classifier = Classifier::new(table);
    assert_eq!(
      classifier.classify(Rgb([5, 0, 0]), "test"),
      Ok(RipenessLabel::Unripe)
    );

    let table = ReferenceTable::new().with_fruit(
      "test",
      [[0, 0, 0], [100, 0, 0], [120, 0, 0], [250, 250, 250]],
    );
    let classifier = Classifier::new(table);
    assert_eq!(
      classifier.classify(Rgb([110, 0, 0]), "test"),
      Ok(RipenessLabel::SemiRipe)
    );
  }

  #[test]
  fn test_unknown_fruit() {
    let classifier = Classifier::default();
    assert_eq!(
      classifier.classify(Rgb([1, 2, 3]), "durian"),
      Err(ClassifyError::UnknownFruit("durian".to_string()))
    );
  }

  #[test]
  fn test_fruit_name_is_case_insensitive() {
    let classifier = Classifier::default();
    let color = classifier
      .table()
      .reference_color("tomato", RipenessLabel::Ripe)
      .expect("参考色应当存在");
    assert_eq!(classifier.classify(color, "ToMaTo"), Ok(RipenessLabel::Ripe));
  }

  #[test]
  fn test_nearest_reference_wins() {
    let classifier = Classifier::default();
    // 接近番茄成熟红色的颜色
    assert_eq!(
      classifier.classify(Rgb([190, 50, 40]), "tomato"),
      Ok(RipenessLabel::Ripe)
    );
    // 黑色离香蕉过熟的深褐色最近
    assert_eq!(
      classifier.classify(Rgb([0, 0, 0]), "banana"),
      Ok(RipenessLabel::Overripe)
    );
  }
}
