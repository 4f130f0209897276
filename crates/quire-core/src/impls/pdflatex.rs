//! PdfLatexRenderer - pdflatex による PDF 生成
//!
//! ソースを `src.tex` として書き出し、pdflatex を `passes` 回実行して
//! `src.pdf` を読み戻します。2 パス以上で相互参照・引用が解決されます。

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::{Artifact, RenderError};
use crate::ports::Renderer;

const SOURCE_FILE: &str = "src.tex";
const OUTPUT_FILE: &str = "src.pdf";

#[derive(Debug, Clone)]
pub struct PdfLatexRenderer {
    executable: PathBuf,
    passes: u32,
    timeout: Duration,
}

impl PdfLatexRenderer {
    pub const DEFAULT_PASSES: u32 = 2;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            passes: Self::DEFAULT_PASSES,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// コンパイラの実行回数。0 は 1 として扱う
    pub fn with_passes(mut self, passes: u32) -> Self {
        self.passes = passes.max(1);
        self
    }

    /// 全パス合計の実時間上限
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run_pass(&self, pass: u32, dir: &Path) -> Result<(), RenderError> {
        let started_at = Instant::now();
        let output = Command::new(&self.executable)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(SOURCE_FILE)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                warn!(
                    target = "quire::render::pdflatex",
                    op = "pdflatex::run_pass",
                    pass,
                    executable = %self.executable.display(),
                    error = %err,
                    "Failed to spawn pdflatex"
                );
                RenderError::Spawn(err)
            })?;

        if !output.status.success() {
            // pdflatex reports errors on stdout; keep stderr too in case a wrapper uses it.
            let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
            log.push_str(&String::from_utf8_lossy(&output.stderr));
            let exit_code = output.status.code();
            warn!(
                target = "quire::render::pdflatex",
                op = "pdflatex::run_pass",
                pass,
                exit_code = exit_code.map(i64::from).unwrap_or(-1),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "pdflatex pass failed"
            );
            return Err(RenderError::Compile {
                pass,
                exit_code,
                log,
            });
        }

        debug!(
            target = "quire::render::pdflatex",
            op = "pdflatex::run_pass",
            pass,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "pdflatex pass finished"
        );
        Ok(())
    }

    async fn run_passes(&self, dir: &Path) -> Result<(), RenderError> {
        for pass in 1..=self.passes {
            self.run_pass(pass, dir).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Renderer for PdfLatexRenderer {
    async fn render(&self, source: &[u8], dir: &Path) -> Result<Artifact, RenderError> {
        let started_at = Instant::now();
        tokio::fs::write(dir.join(SOURCE_FILE), source)
            .await
            .map_err(RenderError::WriteSource)?;

        // Dropping the in-flight pass on timeout kills the child (kill_on_drop).
        tokio::time::timeout(self.timeout, self.run_passes(dir))
            .await
            .map_err(|_| {
                warn!(
                    target = "quire::render::pdflatex",
                    op = "pdflatex::render",
                    timeout_ms = self.timeout.as_millis() as u64,
                    "pdflatex timed out"
                );
                RenderError::TimedOut(self.timeout)
            })??;

        let pdf = tokio::fs::read(dir.join(OUTPUT_FILE))
            .await
            .map_err(RenderError::MissingOutput)?;

        info!(
            target = "quire::render::pdflatex",
            op = "pdflatex::render",
            passes = self.passes,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            pdf_bytes = pdf.len(),
            "Document rendered"
        );
        Ok(Artifact::pdf(pdf))
    }
}
