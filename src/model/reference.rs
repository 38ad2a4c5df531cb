// 该文件是 Shuguo （熟果） 项目的一部分。
// src/model/reference.rs - 参考色表
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

use std::collections::BTreeMap;

use image::Rgb;

use crate::model::RipenessLabel;

// 内置参考色，按 Unripe / Semi-Ripe / Ripe / Overripe 排列
const BUILTIN_REFERENCES: [(&str, [[u8; 3]; 4]); 3] = [
  (
    "banana",
    [[96, 140, 46], [178, 180, 60], [228, 200, 62], [122, 86, 40]],
  ),
  (
    "tomato",
    [[118, 168, 80], [218, 158, 70], [198, 40, 34], [118, 26, 24]],
  ),
  (
    "mango",
    [[88, 138, 52], [188, 178, 72], [238, 160, 42], [158, 92, 38]],
  ),
];

/// 水果种类到各成熟阶段参考色的映射
///
/// 水果名不区分大小写。每种水果恰好对应四个阶段的参考色，
/// 构建完成后不可修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
  fruits: BTreeMap<String, [Rgb<u8>; 4]>,
}

fn normalize(fruit: &str) -> String {
  fruit.trim().to_lowercase()
}

impl ReferenceTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// 内置的 3 种水果参考色表
  pub fn builtin() -> Self {
    BUILTIN_REFERENCES
      .iter()
      .fold(Self::new(), |table, (fruit, colors)| {
        table.with_fruit(fruit, *colors)
      })
  }

  /// 追加（或覆盖）一种水果的参考色
  pub fn with_fruit(mut self, fruit: &str, colors: [[u8; 3]; 4]) -> Self {
    self.fruits.insert(normalize(fruit), colors.map(Rgb));
    self
  }

  pub fn get(&self, fruit: &str) -> Option<&[Rgb<u8>; 4]> {
    self.fruits.get(&normalize(fruit))
  }

  pub fn contains(&self, fruit: &str) -> bool {
    self.get(fruit).is_some()
  }

  pub fn reference_color(&self, fruit: &str, label: RipenessLabel) -> Option<Rgb<u8>> {
    self.get(fruit).map(|colors| colors[label.ordinal()])
  }

  /// 按字母序列出所有水果名（小写）
  pub fn fruits(&self) -> impl Iterator<Item = &str> {
    self.fruits.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.fruits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fruits.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_table_shape() {
    let table = ReferenceTable::builtin();
    assert_eq!(table.len(), 3);
    assert_eq!(
      table.fruits().collect::<Vec<_>>(),
      vec!["banana", "mango", "tomato"]
    );
  }

  #[test]
  fn test_lookup_is_case_insensitive() {
    let table = ReferenceTable::builtin();
    assert!(table.contains("Banana"));
    assert!(table.contains("  TOMATO "));
    assert!(!table.contains("apple"));
    assert_eq!(
      table.reference_color("Mango", RipenessLabel::Ripe),
      Some(Rgb([238, 160, 42]))
    );
  }

  #[test]
  fn test_with_fruit_overrides() {
    let table = ReferenceTable::builtin().with_fruit("BANANA", [[1, 1, 1]; 4]);
    assert_eq!(table.len(), 3);
    assert_eq!(
      table.reference_color("banana", RipenessLabel::Overripe),
      Some(Rgb([1, 1, 1]))
    );
  }
}
