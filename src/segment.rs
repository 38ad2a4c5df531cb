// 该文件是 Shuguo （熟果） 项目的一部分。
// src/segment.rs - 前景分割与裁剪
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

use image::{GrayImage, RgbImage, imageops};
use imageproc::{
  contours::{BorderType, Contour, find_contours},
  contrast::{ThresholdType, otsu_level, threshold},
  geometry::{approximate_polygon_dp, contour_area},
  point::Point,
  rect::Rect,
};
use tracing::debug;

// 轮廓面积下限，占整幅图像像素数的比例
const DEFAULT_MIN_AREA_RATIO: f64 = 0.025;
// 多边形近似的周长容差
const DEFAULT_APPROX_EPSILON: f64 = 3.0;

/// 分割配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterConfig {
  /// 面积不超过 `图像像素数 * min_area_ratio` 的轮廓视为噪声
  pub min_area_ratio: f64,
  /// Douglas-Peucker 近似容差
  pub approx_epsilon: f64,
}

impl Default for SegmenterConfig {
  fn default() -> Self {
    Self {
      min_area_ratio: DEFAULT_MIN_AREA_RATIO,
      approx_epsilon: DEFAULT_APPROX_EPSILON,
    }
  }
}

/// 前景分割器
///
/// 假定背景较亮、水果较暗：灰度化后用 Otsu 阈值反相二值化，
/// 追踪轮廓，只考虑没有父轮廓的外边界。
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
  config: SegmenterConfig,
}

/// 点集的轴对齐外接矩形，宽高按像素计（含两端）
fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
  let first = points.first()?;
  let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.x, first.y, first.x, first.y);
  for p in points.iter().skip(1) {
    x_min = x_min.min(p.x);
    y_min = y_min.min(p.y);
    x_max = x_max.max(p.x);
    y_max = y_max.max(p.y);
  }

  let width = (x_max - x_min + 1) as u32;
  let height = (y_max - y_min + 1) as u32;
  Some(Rect::at(x_min, y_min).of_size(width, height))
}

impl Segmenter {
  pub fn new(config: SegmenterConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &SegmenterConfig {
    &self.config
  }

  /// 反相二值化前景掩码，前景为 255
  ///
  /// 灰度化使用 `image` 的 Rec. 709 亮度权重（0.2126, 0.7152, 0.0722），
  /// 而非 BT.601 的 (0.299, 0.587, 0.114)。
  pub fn foreground_mask(&self, image: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(image);
    let level = otsu_level(&gray);
    debug!("灰度（Rec. 709）Otsu 阈值: {}", level);
    threshold(&gray, level, ThresholdType::BinaryInverted)
  }

  /// 定位前景外接矩形
  ///
  /// 所有通过面积阈值的顶层轮廓中，遍历顺序上最后一个胜出，
  /// 并不比较面积大小。没有轮廓通过时返回 `None`。
  pub fn locate(&self, image: &RgbImage) -> Option<Rect> {
    let mask = self.foreground_mask(image);
    let contours: Vec<Contour<i32>> = find_contours(&mask);
    let min_area = (image.width() as f64) * (image.height() as f64) * self.config.min_area_ratio;

    let mut located = None;
    let mut candidates = 0;
    for contour in contours
      .iter()
      .filter(|c| c.parent.is_none() && c.border_type == BorderType::Outer)
    {
      candidates += 1;
      let area = contour_area(&contour.points);
      if area <= min_area {
        continue;
      }

      let approx = approximate_polygon_dp(&contour.points, self.config.approx_epsilon, true);
      let rect = if approx.is_empty() {
        bounding_rect(&contour.points)
      } else {
        bounding_rect(&approx)
      };
      debug!("轮廓面积 {:.1} 通过阈值 {:.1}，外接矩形: {:?}", area, min_area, rect);
      located = rect.or(located);
    }

    debug!(
      "轮廓总数: {}，顶层轮廓: {}，选中: {:?}",
      contours.len(),
      candidates,
      located
    );
    located
  }

  /// 裁剪出前景区域，找不到前景时返回原图
  pub fn crop(&self, image: &RgbImage) -> RgbImage {
    match self.locate(image) {
      Some(rect) => {
        let x = rect.left().max(0) as u32;
        let y = rect.top().max(0) as u32;
        let width = rect.width().min(image.width().saturating_sub(x));
        let height = rect.height().min(image.height().saturating_sub(y));
        imageops::crop_imm(image, x, y, width, height).to_image()
      }
      None => {
        debug!("没有轮廓通过面积阈值，使用原图");
        image.clone()
      }
    }
  }
}
