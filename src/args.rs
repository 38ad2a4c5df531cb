// 该文件是 Shuguo （熟果） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::{Parser, Subcommand};
use url::Url;

/// Shuguo 水果成熟度估计
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// 估计单张图像的成熟度
  Classify {
    /// 输入图像，例如 image:///data/banana.jpg
    #[arg(long, value_name = "SOURCE")]
    input: Url,
    /// 水果种类，不区分大小写
    #[arg(long, value_name = "FRUIT")]
    fruit: String,
    /// 把分割后的图像保存到当前目录
    #[arg(long)]
    debug_crop: bool,
  },
  /// 在带标注的数据集上评估准确率
  Evaluate {
    /// 数据集根目录
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    /// 每个成熟度目录最多评估的文件数
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
    /// 单个文件出错时跳过而不是终止
    #[arg(long)]
    skip_errors: bool,
    /// 评估记录输出目录，例如 folder:///tmp/records
    #[arg(long, value_name = "OUTPUT")]
    record: Option<Url>,
  },
}
