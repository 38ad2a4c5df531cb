// 该文件是 Shuguo （熟果） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch {
    expected: &'static str,
    found: String,
  },
  #[error("无效的图片路径: {0}")]
  InvalidPath(String),
  #[error("无法打开图片文件 {}: {source}", path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("无法解码图片文件 {}: {source}", path.display())]
  ImageDecode {
    path: PathBuf,
    source: image::ImageError,
  },
}

/// 读取并解码为 RGB 图像，格式按文件内容判断
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> Result<RgbImage, ImageFileInputError> {
  let path = path.as_ref();
  let io_error = |source| ImageFileInputError::Io {
    path: path.to_path_buf(),
    source,
  };

  let image = ImageReader::open(path)
    .map_err(io_error)?
    .with_guessed_format()
    .map_err(io_error)?
    .decode()
    .map_err(|source| {
      error!("解码失败: {}", path.display());
      ImageFileInputError::ImageDecode {
        path: path.to_path_buf(),
        source,
      }
    })?
    .to_rgb8();

  debug!(
    "读取图片 {}: {}x{}",
    path.display(),
    image.width(),
    image.height()
  );
  Ok(image)
}

/// 单张图像文件输入，作为迭代器只产出一帧
pub struct ImageFileInput {
  image: Option<RgbImage>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemeMismatch {
        expected: Self::SCHEME,
        found: url.scheme().to_string(),
      });
    }

    let path = urlencoding::decode(url.path())
      .map_err(|_| ImageFileInputError::InvalidPath(url.path().to_string()))?;
    Self::open(&*path)
  }
}

impl ImageFileInput {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageFileInputError> {
    Ok(ImageFileInput {
      image: Some(load_rgb_image(path)?),
    })
  }
}

impl From<RgbImage> for ImageFileInput {
  fn from(image: RgbImage) -> Self {
    ImageFileInput { image: Some(image) }
  }
}

impl Iterator for ImageFileInput {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take()
  }
}
