// 该文件是 Shuguo （熟果） 项目的一部分。
// src/frame.rs - HSV 帧定义
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

use image::RgbImage;

use crate::color::rgb_to_hsv;

const HSV_CHANNELS: usize = 3;

/// HSV 帧，按 HWC 排列
///
/// 通道取值遵循 8 位约定：H ∈ [0, 180)，S 与 V ∈ [0, 255]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvFrame {
  width: u32,
  height: u32,
  data: Box<[u8]>,
}

impl HsvFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    let size = HSV_CHANNELS * width * height;
    Self {
      width: width as u32,
      height: height as u32,
      data: vec![0u8; size].into_boxed_slice(),
    }
  }

  pub fn height(&self) -> usize {
    self.height as usize
  }

  pub fn width(&self) -> usize {
    self.width as usize
  }

  /// 像素总数
  pub fn pixel_count(&self) -> usize {
    self.width() * self.height()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
    self.data.chunks_exact(HSV_CHANNELS)
  }

  pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
    self.data.chunks_exact_mut(HSV_CHANNELS)
  }
}

impl From<&RgbImage> for HsvFrame {
  fn from(image: &RgbImage) -> Self {
    let mut frame = {
      let (width, height) = image.dimensions();
      HsvFrame::with_shape(height as usize, width as usize)
    };

    for (dst, src) in frame.pixels_mut().zip(image.pixels()) {
      dst.copy_from_slice(&rgb_to_hsv(*src));
    }
    frame
  }
}
