//! Process-wide library state.
//!
//! [`init`] installs the state once; later calls are no-ops. [`shutdown`]
//! tears it down again. Opening a client initializes lazily, so calling
//! [`init`] is only needed to choose the application name that shows up in
//! logs.
//!
//! The state holds the request-id generator. Ids are positive, start at a
//! random point and wrap back to 1. The number of live client sockets is
//! tracked separately and survives a shutdown, since those sockets are owned
//! by their handles and not by the library.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_APP_NAME: &str = "snmp_query";

static STATE: Mutex<Option<LibraryState>> = Mutex::new(None);
static OPEN_ENDPOINTS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct LibraryState {
    app_name: String,
    next_request_id: i32,
}

impl LibraryState {
    fn new(app_name: &str) -> Self {
        let seed = rand::random::<u32>() % (i32::MAX as u32);
        Self {
            app_name: app_name.to_string(),
            next_request_id: seed as i32 + 1,
        }
    }

    fn take_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = if id == i32::MAX { 1 } else { id + 1 };
        id
    }
}

// The state is plain data, so a panic while it was held cannot leave it torn.
fn lock() -> MutexGuard<'static, Option<LibraryState>> {
    STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Initializes the library. Returns `true` if this call installed the state,
/// `false` if it was already initialized (the existing name is kept).
pub fn init(app_name: &str) -> bool {
    let mut state = lock();
    if state.is_some() {
        return false;
    }
    *state = Some(LibraryState::new(app_name));
    tracing::debug!(target: "snmp_query::library", app = app_name, "library initialized");
    true
}

/// Tears down the library state. Returns `true` if there was state to remove.
/// Open handles keep working; the next request re-initializes lazily.
pub fn shutdown() -> bool {
    let removed = lock().take();
    if let Some(state) = &removed {
        tracing::debug!(target: "snmp_query::library", app = %state.app_name, "library shut down");
    }
    removed.is_some()
}

pub fn is_initialized() -> bool {
    lock().is_some()
}

/// The name passed to [`init`], if the library is initialized.
pub fn app_name() -> Option<String> {
    lock().as_ref().map(|state| state.app_name.clone())
}

/// Number of client sockets currently open in this process.
pub fn open_endpoints() -> usize {
    OPEN_ENDPOINTS.load(Ordering::SeqCst)
}

pub(crate) fn ensure_init() {
    let mut state = lock();
    if state.is_none() {
        *state = Some(LibraryState::new(DEFAULT_APP_NAME));
    }
}

pub(crate) fn next_request_id() -> i32 {
    let mut guard = lock();
    guard
        .get_or_insert_with(|| LibraryState::new(DEFAULT_APP_NAME))
        .take_request_id()
}

pub(crate) fn endpoint_opened() {
    OPEN_ENDPOINTS.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn endpoint_closed() {
    OPEN_ENDPOINTS.fetch_sub(1, Ordering::SeqCst);
}
