// 该文件是 Shuguo （熟果） 项目的一部分。
// src/color.rs - 代表色提取
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

//! 代表色提取模块
//!
//! 将图像转换到 HSV 空间，屏蔽低饱和度与低亮度的像素（背景、阴影、高光），
//! 再对整幅图像求各通道均值，最后把均值转换回 RGB。
//!
//! 注意：被屏蔽的像素置零后仍计入分母，因此屏蔽比例越高，均值越偏向零。

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::frame::HsvFrame;

// 默认 HSV 阈值（含边界）
const DEFAULT_HSV_LOWER: [u8; 3] = [0, 50, 50];
const DEFAULT_HSV_UPPER: [u8; 3] = [255, 255, 255];

/// 8 位色相的取值上限（不含），一个单位代表 2 度
pub const HUE_RANGE: i32 = 180;

/// RGB 转 HSV（8 位约定）
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> [u8; 3] {
  let [r, g, b] = pixel.0.map(i32::from);
  let v = r.max(g).max(b);
  let min = r.min(g).min(b);
  let diff = v - min;

  let s = if v == 0 {
    0
  } else {
    (diff as f32 * 255.0 / v as f32).round() as i32
  };

  let h = if diff == 0 {
    0
  } else {
    let mut degree = if v == r {
      60.0 * (g - b) as f32 / diff as f32
    } else if v == g {
      120.0 + 60.0 * (b - r) as f32 / diff as f32
    } else {
      240.0 + 60.0 * (r - g) as f32 / diff as f32
    };
    if degree < 0.0 {
      degree += 360.0;
    }
    let h = (degree / 2.0).round() as i32;
    if h >= HUE_RANGE { h - HUE_RANGE } else { h }
  };

  [h as u8, s as u8, v as u8]
}

/// HSV（8 位约定）转 RGB
pub fn hsv_to_rgb(hsv: [u8; 3]) -> Rgb<u8> {
  let h = (hsv[0] as f32 * 2.0) % 360.0;
  let s = hsv[1] as f32 / 255.0;
  let v = hsv[2] as f32 / 255.0;

  if hsv[1] == 0 {
    return Rgb([hsv[2]; 3]);
  }

  let sector = (h / 60.0).floor();
  let f = h / 60.0 - sector;
  let p = v * (1.0 - s);
  let q = v * (1.0 - s * f);
  let t = v * (1.0 - s * (1.0 - f));

  let (r, g, b) = match sector as u8 {
    0 => (v, t, p),
    1 => (q, v, p),
    2 => (p, v, t),
    3 => (p, q, v),
    4 => (t, p, v),
    _ => (v, p, q),
  };

  Rgb([
    (r * 255.0).round().clamp(0.0, 255.0) as u8,
    (g * 255.0).round().clamp(0.0, 255.0) as u8,
    (b * 255.0).round().clamp(0.0, 255.0) as u8,
  ])
}

/// 代表色提取配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorReducerConfig {
  /// HSV 下界（含）
  pub lower: [u8; 3],
  /// HSV 上界（含）
  pub upper: [u8; 3],
}

impl Default for ColorReducerConfig {
  fn default() -> Self {
    Self {
      lower: DEFAULT_HSV_LOWER,
      upper: DEFAULT_HSV_UPPER,
    }
  }
}

/// 代表色提取器
#[derive(Debug, Clone, Default)]
pub struct ColorReducer {
  config: ColorReducerConfig,
}

impl ColorReducer {
  pub fn new(config: ColorReducerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &ColorReducerConfig {
    &self.config
  }

  fn in_range(&self, hsv: &[u8]) -> bool {
    hsv
      .iter()
      .zip(self.config.lower.iter().zip(self.config.upper.iter()))
      .all(|(value, (lower, upper))| lower <= value && value <= upper)
  }

  /// 将范围之外的像素全部置零，返回保留下来的像素数
  pub fn apply_mask(&self, frame: &mut HsvFrame) -> usize {
    let mut kept = 0;
    for pixel in frame.pixels_mut() {
      if self.in_range(pixel) {
        kept += 1;
      } else {
        pixel.fill(0);
      }
    }
    kept
  }

  /// 对所有像素（包括置零像素）求各通道均值并截断为整数
  pub fn mean_hsv(frame: &HsvFrame) -> [u8; 3] {
    if frame.is_empty() {
      return [0, 0, 0];
    }
    let count = frame.pixel_count();

    let mut sums = [0u64; 3];
    for pixel in frame.pixels() {
      for (sum, value) in sums.iter_mut().zip(pixel) {
        *sum += *value as u64;
      }
    }

    sums.map(|sum| (sum as f64 / count as f64) as u8)
  }

  /// 计算图像的代表色（RGB）
  pub fn average_color(&self, image: &RgbImage) -> Rgb<u8> {
    let mut frame = HsvFrame::from(image);
    let kept = self.apply_mask(&mut frame);
    let mean = Self::mean_hsv(&frame);
    let color = hsv_to_rgb(mean);

    debug!(
      "有效像素: {}/{}，HSV 均值: {:?}，代表色: {:?}",
      kept,
      frame.pixel_count(),
      mean,
      color.0
    );

    color
  }
}
