//! Human-readable and JSON renderings of a pipeline result.

use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

use pipeline_core::{Defect, DefectResult};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageTiming {
    pub index: usize,
    pub stage: String,
    pub ms: f64,
}

/// One processed input and everything printed about it.
pub struct Report<'a> {
    pub source: Option<&'a Path>,
    pub result: &'a DefectResult,
    pub timings: Vec<StageTiming>,
    pub high_value_categories: &'a [String],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<String>,
    #[serde(flatten)]
    result: &'a DefectResult,
    high_value_defects: Vec<usize>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    timings: &'a [StageTiming],
}

impl<'a> Report<'a> {
    pub fn new(
        source: Option<&'a Path>,
        result: &'a DefectResult,
        high_value_categories: &'a [String],
    ) -> Self {
        Self {
            source,
            result,
            timings: Vec::new(),
            high_value_categories,
        }
    }

    pub fn with_timings(mut self, timings: Vec<StageTiming>) -> Self {
        self.timings = timings;
        self
    }

    fn is_high_value(&self, defect: &Defect) -> bool {
        defect
            .category
            .as_deref()
            .is_some_and(|category| self.high_value_categories.iter().any(|c| c == category))
    }

    pub fn to_text(&self) -> String {
        let result = self.result;
        let mut out = format!(
            "frame_id={} defects={}",
            result.frame_id,
            result.defects.len()
        );
        if let Some(camera_id) = &result.camera_id {
            let _ = write!(out, " camera_id={camera_id}");
        }
        if let Some(customer_id) = &result.customer_id {
            let _ = write!(out, " customer_id={customer_id}");
        }
        out.push('\n');

        for defect in &result.defects {
            let bbox = defect.bbox;
            let _ = write!(
                out,
                "  {} confidence={} bbox=({},{},{},{})",
                defect.kind.label(),
                defect.confidence,
                bbox.x,
                bbox.y,
                bbox.w,
                bbox.h
            );
            if let Some(product_id) = defect.product_id {
                let _ = write!(out, " product_id={product_id}");
            }
            if let Some(category) = &defect.category {
                let _ = write!(out, " category={category}");
            }
            if self.is_high_value(defect) {
                out.push_str(" [high-value]");
            }
            out.push('\n');
        }

        for timing in &self.timings {
            let _ = writeln!(
                out,
                "  stage[{}] {}: {:.3} ms",
                timing.index, timing.stage, timing.ms
            );
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let high_value_defects = self
            .result
            .defects
            .iter()
            .enumerate()
            .filter(|(_, defect)| self.is_high_value(defect))
            .map(|(index, _)| index)
            .collect();
        serde_json::to_string(&JsonReport {
            input: self.source.map(|path| path.display().to_string()),
            result: self.result,
            high_value_defects,
            timings: &self.timings,
        })
    }

    /// Write the text report to `<dir>/<source-stem>.txt`. Reports without a
    /// source file are not written.
    pub fn write_to(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        let Some(stem) = self.source.and_then(Path::file_stem) else {
            return Ok(None);
        };
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.txt", stem.to_string_lossy()));
        fs::write(&path, self.to_text())?;
        Ok(Some(path))
    }
}
