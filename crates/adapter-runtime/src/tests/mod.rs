use crate::{
    adapter::EndlessAdapter,
    error::{BoxError, FetchError},
};
use async_trait::async_trait;
use model::row::RowKind;
use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicU32, AtomicUsize, Ordering},
    },
};
use tokio::sync::oneshot;

mod list;

/// One scripted answer of `load_next_page`.
pub(crate) enum Step {
    /// Return a page of this many sequentially numbered items.
    Page(usize),
    Fail(&'static str),
    Panic,
    /// Block until the test sends the step to answer with.
    Wait(oneshot::Receiver<Step>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestRow {
    pub kind: RowKind,
    pub bound: Option<(usize, u32)>,
}

// Mock adapter answering loads from a script
pub(crate) struct ScriptedAdapter {
    script: Mutex<VecDeque<Step>>,
    next_item: AtomicU32,
    retry_on_error: bool,
    pub placeholders_created: AtomicUsize,
    pub errors: Mutex<Vec<String>>,
    pub applied_pages: Mutex<Vec<usize>>,
}

impl ScriptedAdapter {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            next_item: AtomicU32::new(0),
            retry_on_error: false,
            placeholders_created: AtomicUsize::new(0),
            errors: Mutex::new(Vec::new()),
            applied_pages: Mutex::new(Vec::new()),
        }
    }

    /// Numbers loaded items from `start`, so pages continue the initial items.
    pub fn starting_at(self, start: u32) -> Self {
        self.next_item.store(start, Ordering::SeqCst);
        self
    }

    pub fn retrying(mut self) -> Self {
        self.retry_on_error = true;
        self
    }

    fn resolve(&self, step: Step) -> Result<Vec<u32>, BoxError> {
        match step {
            Step::Page(size) => Ok((0..size)
                .map(|_| self.next_item.fetch_add(1, Ordering::SeqCst))
                .collect()),
            Step::Fail(message) => Err(message.into()),
            Step::Panic => panic!("scripted loader panic"),
            Step::Wait(_) => Err("nested wait step".into()),
        }
    }
}

#[async_trait]
impl EndlessAdapter for ScriptedAdapter {
    type Item = u32;
    type RowHandle = TestRow;

    fn create_row_view(&self, kind: RowKind) -> TestRow {
        TestRow { kind, bound: None }
    }

    fn bind_row(&self, handle: &mut TestRow, index: usize, item: &u32) {
        handle.bound = Some((index, *item));
    }

    fn create_placeholder_view(&self) -> TestRow {
        self.placeholders_created.fetch_add(1, Ordering::SeqCst);
        TestRow {
            kind: RowKind::Placeholder,
            bound: None,
        }
    }

    async fn load_next_page(&self) -> Result<Vec<u32>, BoxError> {
        let step = self.script.lock().unwrap().pop_front();
        match step {
            None => Err("script exhausted".into()),
            Some(Step::Wait(gate)) => match gate.await {
                Ok(step) => self.resolve(step),
                Err(_) => Err("gate dropped".into()),
            },
            Some(step) => self.resolve(step),
        }
    }

    fn on_page_applied(&self, page: &[u32]) {
        self.applied_pages.lock().unwrap().push(page.len());
    }

    fn on_error(&self, error: &FetchError) -> bool {
        self.errors.lock().unwrap().push(error.to_string());
        self.retry_on_error
    }
}

pub(crate) fn initial_items(count: u32) -> Vec<u32> {
    (0..count).collect()
}
