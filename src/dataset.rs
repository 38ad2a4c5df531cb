// 该文件是 Shuguo （熟果） 项目的一部分。
// src/dataset.rs - 带标注的数据集目录解析
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

//! 数据集目录约定
//!
//! ```text
//! root/
//!   Banana/
//!     0/ 1/ 2/ 3/      成熟度序号，对应 Unripe / Semi-Ripe / Ripe / Overripe
//!   Tomato/
//!     ...
//!   0/                 哨兵目录，扫描到此处即停止
//! ```
//!
//! 目录按名称排序后依次扫描，水果名统一转为小写。

use std::{
  fs,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::RipenessLabel;

/// 水果层级的哨兵目录名
pub const SENTINEL_DIRECTORY: &str = "0";

// 不参与评估的文件扩展名
const EXCLUDED_EXTENSIONS: [&str; 3] = ["gif", "jfif", "ini"];

#[derive(Error, Debug)]
pub enum DatasetError {
  #[error("无法读取目录 {}: {source}", path.display())]
  ReadDir {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("无效的成熟度目录 {}，目录名应为 0-3", path.display())]
  InvalidLabelDirectory { path: PathBuf },
}

/// 一条带标注的图像记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
  pub path: PathBuf,
  pub fruit: String,
  pub truth: RipenessLabel,
}

struct Entry {
  name: String,
  path: PathBuf,
}

fn sorted_entries(dir: &Path, want_dir: bool) -> Result<Vec<Entry>, DatasetError> {
  let read_error = |source| DatasetError::ReadDir {
    path: dir.to_path_buf(),
    source,
  };

  let mut entries = Vec::new();
  for entry in fs::read_dir(dir).map_err(read_error)? {
    let entry = entry.map_err(read_error)?;
    let path = entry.path();
    if path.is_dir() != want_dir {
      continue;
    }
    entries.push(Entry {
      name: entry.file_name().to_string_lossy().into_owned(),
      path,
    });
  }

  entries.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(entries)
}

fn is_excluded(path: &Path) -> bool {
  path
    .extension()
    .map(|ext| ext.to_string_lossy().to_lowercase())
    .is_some_and(|ext| EXCLUDED_EXTENSIONS.contains(&ext.as_str()))
}

/// 数据集目录解析器
#[derive(Debug, Clone, Default)]
pub struct DatasetSchema {
  limit_per_directory: Option<usize>,
}

impl DatasetSchema {
  pub fn new() -> Self {
    Self::default()
  }

  /// 限制每个成熟度目录最多取多少个文件，用于快速冒烟测试
  pub fn with_limit(mut self, limit: Option<usize>) -> Self {
    self.limit_per_directory = limit;
    self
  }

  pub fn limit_per_directory(&self) -> Option<usize> {
    self.limit_per_directory
  }

  /// 扫描数据集根目录，得到全部待评估的图像记录
  pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Vec<LabeledImage>, DatasetError> {
    let root = root.as_ref();
    info!("扫描数据集: {}", root.display());

    let mut records = Vec::new();
    for (index, fruit_dir) in sorted_entries(root, true)?.into_iter().enumerate() {
      if fruit_dir.name == SENTINEL_DIRECTORY {
        if index == 0 {
          warn!(
            "哨兵目录 {} 排在最前，数据集中的水果目录全部被忽略",
            fruit_dir.path.display()
          );
        } else {
          debug!("遇到哨兵目录，停止扫描");
        }
        break;
      }

      let fruit = fruit_dir.name.to_lowercase();
      for label_dir in sorted_entries(&fruit_dir.path, true)? {
        let truth = label_dir
          .name
          .parse::<usize>()
          .ok()
          .and_then(RipenessLabel::from_ordinal)
          .ok_or_else(|| DatasetError::InvalidLabelDirectory {
            path: label_dir.path.clone(),
          })?;

        let files = sorted_entries(&label_dir.path, false)?
          .into_iter()
          .filter(|entry| !is_excluded(&entry.path))
          .take(self.limit_per_directory.unwrap_or(usize::MAX));

        let before = records.len();
        records.extend(files.map(|entry| LabeledImage {
          path: entry.path,
          fruit: fruit.clone(),
          truth,
        }));
        debug!(
          "{} / {}: {} 个文件",
          fruit,
          truth,
          records.len() - before
        );
      }
    }

    info!("共找到 {} 个待评估文件", records.len());
    Ok(records)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::{TempDir, tempdir};

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
  }

  fn tree(files: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for file in files {
      touch(dir.path(), file);
    }
    dir
  }

  #[test]
  fn test_scan_builds_records() {
    let dir = tree(&[
      "Banana/0/a.jpg",
      "Banana/2/b.png",
      "Tomato/3/c.jpg",
      "Tomato/1/d.bmp",
    ]);

    let records = DatasetSchema::new().scan(dir.path()).unwrap();
    let summary: Vec<(String, RipenessLabel, String)> = records
      .iter()
      .map(|r| {
        (
          r.fruit.clone(),
          r.truth,
          r.path.file_name().unwrap().to_string_lossy().into_owned(),
        )
      })
      .collect();

    assert_eq!(
      summary,
      vec![
        ("banana".to_string(), RipenessLabel::Unripe, "a.jpg".to_string()),
        ("banana".to_string(), RipenessLabel::Ripe, "b.png".to_string()),
        ("tomato".to_string(), RipenessLabel::SemiRipe, "d.bmp".to_string()),
        ("tomato".to_string(), RipenessLabel::Overripe, "c.jpg".to_string()),
      ]
    );
  }

  #[test]
  fn test_excluded_extensions_are_skipped() {
    let dir = tree(&[
      "Mango/1/keep.jpg",
      "Mango/1/anim.gif",
      "Mango/1/photo.JFIF",
      "Mango/1/desktop.ini",
    ]);

    let records = DatasetSchema::new().scan(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].path.ends_with("keep.jpg"));
  }

  #[test]
  fn test_sentinel_stops_scan() {
    // 排序后 "0" 在所有字母开头的目录之前
    let dir = tree(&["0/3/x.jpg", "Banana/0/a.jpg"]);
    let records = DatasetSchema::new().scan(dir.path()).unwrap();
    assert!(records.is_empty());
  }

  #[test]
  fn test_leading_sentinel_hides_every_fruit() {
    let dir = tree(&[
      "0/1/x.jpg",
      "Banana/0/a.jpg",
      "Tomato/2/b.jpg",
      "apple/3/c.jpg",
    ]);
    let records = DatasetSchema::new().scan(dir.path()).unwrap();
    assert!(records.is_empty());
  }

  #[test]
  fn test_sentinel_only_applies_at_fruit_level() {
    // 水果目录下的 "0" 是成熟度目录，不是哨兵
    let dir = tree(&["Banana/0/a.jpg"]);
    let records = DatasetSchema::new().scan(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
  }

  #[test]
  fn test_limit_is_per_directory() {
    let dir = tree(&[
      "Banana/0/a.jpg",
      "Banana/0/b.jpg",
      "Banana/0/c.jpg",
      "Banana/1/d.jpg",
      "Banana/1/e.jpg",
      "Tomato/2/f.jpg",
    ]);

    let records = DatasetSchema::new()
      .with_limit(Some(2))
      .scan(dir.path())
      .unwrap();
    assert_eq!(records.len(), 5);
    assert!(!records.iter().any(|r| r.path.ends_with("c.jpg")));
  }

  #[test]
  fn test_invalid_label_directory() {
    let dir = tree(&["Banana/ripe/a.jpg"]);
    let result = DatasetSchema::new().scan(dir.path());
    assert!(matches!(
      result,
      Err(DatasetError::InvalidLabelDirectory { .. })
    ));

    let dir = tree(&["Banana/4/a.jpg"]);
    assert!(DatasetSchema::new().scan(dir.path()).is_err());
  }

  #[test]
  fn test_missing_root() {
    let dir = tempdir().unwrap();
    let result = DatasetSchema::new().scan(dir.path().join("nope"));
    assert!(matches!(result, Err(DatasetError::ReadDir { .. })));
  }
}
