// 该文件是 Shuguo （熟果） 项目的一部分。
// src/model.rs - 成熟度模型
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

use std::fmt;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 成熟度标签，顺序即成熟阶段的先后
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RipenessLabel {
  Unripe,
  SemiRipe,
  Ripe,
  Overripe,
}

impl RipenessLabel {
  pub const ALL: [RipenessLabel; 4] = [
    RipenessLabel::Unripe,
    RipenessLabel::SemiRipe,
    RipenessLabel::Ripe,
    RipenessLabel::Overripe,
  ];

  pub fn ordinal(self) -> usize {
    self as usize
  }

  pub fn from_ordinal(ordinal: usize) -> Option<Self> {
    Self::ALL.get(ordinal).copied()
  }

  pub fn as_str(self) -> &'static str {
    match self {
      RipenessLabel::Unripe => "Unripe",
      RipenessLabel::SemiRipe => "Semi-Ripe",
      RipenessLabel::Ripe => "Ripe",
      RipenessLabel::Overripe => "Overripe",
    }
  }

  /// 两个标签之间相差的阶段数
  pub fn steps_to(self, other: RipenessLabel) -> usize {
    self.ordinal().abs_diff(other.ordinal())
  }
}

impl fmt::Display for RipenessLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

mod classifier;
mod reference;
mod ripeness;

pub use self::classifier::{Classifier, ClassifyError};
pub use self::reference::ReferenceTable;
pub use self::ripeness::{Estimate, RipenessModel, RipenessModelBuilder, Sample};
