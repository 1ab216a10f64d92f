use crate::domain::model::{GenerationResult, InputRecord};
use crate::domain::ports::ProgressSink;
use std::io::Write;
use std::sync::Mutex;

/// 逐筆輸出處理狀態與模型結果
pub struct ConsoleProgress<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, text: std::fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            // 終端輸出失敗不影響批次
            let _ = out.write_fmt(text).and_then(|_| out.flush());
        }
    }
}

impl<W: Write + Send> ProgressSink for ConsoleProgress<W> {
    fn row_started(&self, _index: usize, _total: usize, record: &InputRecord) {
        self.emit(format_args!("Processing ID: {}...\n", record.id));
    }

    fn row_finished(&self, _index: usize, _total: usize, result: &GenerationResult) {
        self.emit(format_args!(
            "ID: {}\nGenerated ICD-10 Codes: {}\n---\n",
            result.id,
            result.output()
        ));
    }
}
