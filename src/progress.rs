use std::{io::stdout, io::Write};

pub trait Progress {
    fn stage(&mut self, text: &str);
    fn set_total(&mut self, total: usize);
    fn progress(&mut self, step: bool, text: &str);
}

pub struct ProgressConsole {
    pos: usize,
    total: usize,
    prev_percent: usize,
    prev_text: String,
}

impl ProgressConsole {
    pub fn new() -> ProgressConsole {
        ProgressConsole {
            pos: 0,
            total: 1,
            prev_percent: 101,
            prev_text: String::new()
        }
    }

    fn show_progress(&mut self, text: &str) {
        const MAX_WIDTH: usize = 42;
        let total = self.total.max(1);
        let width = (MAX_WIDTH * self.pos / total).min(MAX_WIDTH);
        let percent = (100 * self.pos / total).min(100);
        if percent == self.prev_percent && text == self.prev_text {
            return;
        }
        let mut out = stdout().lock();
        let bar = "#".repeat(width) + &"-".repeat(MAX_WIDTH - width);
        let _ = write!(out, "{:3}% [{}] {}                   \r", percent, bar, text);
        if self.pos >= total {
            let _ = writeln!(out);
        }
        let _ = out.flush();
        self.prev_text = text.to_string();
        self.prev_percent = percent;
    }
}

impl Progress for ProgressConsole {
    fn stage(&mut self, text: &str) {
        if self.pos != 0 && self.pos < self.total {
            println!();
        }
        self.pos = 0;
        println!("{}", text);
        log::info!("{}", text);
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
        self.pos = 0;
        self.prev_percent = 101;
    }

    fn progress(&mut self, step: bool, text: &str) {
        if step { self.pos += 1; }
        self.show_progress(text);
    }
}

pub struct ProgressCallBack {
    pos: usize,
    total: usize,
    stage_cb: Box<dyn FnMut(&str)>,
    progress_cb: Box<dyn FnMut(usize, usize, &str)>,
}

impl ProgressCallBack {
    pub fn new<SF, PF>(stage_fun: SF, progress_fun: PF) -> ProgressCallBack
    where
        SF: FnMut(&str) + 'static,
        PF: FnMut(usize, usize, &str) + 'static,
    {
        ProgressCallBack {
            pos: 0,
            total: 0,
            stage_cb: Box::new(stage_fun),
            progress_cb: Box::new(progress_fun),
        }
    }
}

impl Progress for ProgressCallBack {
    fn stage(&mut self, text: &str) {
        (*self.stage_cb)(text);
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
        self.pos = 0;
    }

    fn progress(&mut self, step: bool, text: &str) {
        if step { self.pos += 1; }
        (*self.progress_cb)(self.pos, self.total, text);
    }
}

/// Iterator reporting every produced item into `Progress`
pub struct ProgressIter<'p, I: Iterator, P: Progress + ?Sized> {
    items:    I,
    progress: Option<&'p mut P>,
    unit:     String,
}

impl<'p, I: ExactSizeIterator, P: Progress + ?Sized> ProgressIter<'p, I, P> {
    pub fn new(
        items:    I,
        progress: &'p mut P,
        desc:     &str,
        unit:     &str,
        enabled:  bool,
    ) -> Self {
        let progress = if enabled {
            progress.stage(desc);
            progress.set_total(items.len());
            Some(progress)
        } else {
            None
        };
        ProgressIter { items, progress, unit: unit.to_string() }
    }
}

impl<'p, I, P> Iterator for ProgressIter<'p, I, P>
where
    I: Iterator,
    I::Item: std::fmt::Display,
    P: Progress + ?Sized,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        if let Some(progress) = &mut self.progress {
            progress.progress(true, &format!("{} {}", self.unit, item));
        }
        Some(item)
    }
}
