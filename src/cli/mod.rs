// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::ServiceConfig;
use crate::vision::ocr::RegionPolicy;

/// Region digit OCR service
#[derive(Parser, Debug, Default)]
#[command(name = "region-ocr")]
#[command(version)]
#[command(about = "Crop image regions and read the digits in each one", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "REGION_OCR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "REGION_OCR_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "REGION_OCR_PORT")]
    pub port: Option<u16>,

    /// Directory with the front-end bundle
    #[arg(long, env = "REGION_OCR_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Maximum upload size in bytes
    #[arg(long, env = "REGION_OCR_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Tesseract language pack
    #[arg(long, env = "TESSERACT_LANG")]
    pub lang: Option<String>,

    /// Tesseract page segmentation mode
    #[arg(long, env = "TESSERACT_PSM")]
    pub psm: Option<i32>,

    /// How regions reaching past the image edge are handled
    #[arg(long, value_enum, env = "REGION_OCR_REGION_POLICY")]
    pub region_policy: Option<RegionPolicy>,
}

impl Cli {
    /// Resolve the final configuration: defaults, then file, then flags/env
    pub fn into_config(self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(static_dir) = self.static_dir {
            config.server.static_dir = static_dir;
        }
        if let Some(max_upload_bytes) = self.max_upload_bytes {
            config.server.max_upload_bytes = max_upload_bytes;
        }
        if let Some(lang) = self.lang {
            config.ocr.lang = lang;
        }
        if let Some(psm) = self.psm {
            config.ocr.psm = psm;
        }
        if let Some(region_policy) = self.region_policy {
            config.ocr.region_policy = region_policy;
        }

        Ok(config)
    }
}
