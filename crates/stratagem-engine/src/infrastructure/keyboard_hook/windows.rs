//! Windows low-level keyboard hook implementation.
//!
//! This module installs a WH_KEYBOARD_LL hook on a dedicated Win32
//! message-loop thread.  The hook procedure classifies each key-down, asks
//! the active [`KeyEventHandler`] for a verdict, and swallows the key when
//! told to.
//!
//! Only one hook may be installed per process: the hook procedure is a plain
//! `extern "system"` function and finds its handler through a process-wide
//! slot, guarded by [`HOOK_OWNED`].
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, RwLock};
use std::thread;

use stratagem_core::keymap::windows_scan::{consult_handler, is_keypad_key};
use stratagem_core::PhysicalKeyId;
use tracing::{error, info};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, KBDLLHOOKSTRUCT_FLAGS,
    LLKHF_EXTENDED, LLKHF_INJECTED, MSG, PM_NOREMOVE, WH_KEYBOARD_LL, WM_KEYDOWN, WM_QUIT,
    WM_SYSKEYDOWN, WM_USER,
};

use super::{HookError, HookHandle, HookVerdict, KeyDownEvent, KeyEventHandler, KeyboardHook};

/// `true` while some [`WindowsKeyboardHook`] owns the process-wide hook.
static HOOK_OWNED: AtomicBool = AtomicBool::new(false);

/// Handler consulted by [`keyboard_hook_proc`].  Cleared before the hook is removed.
static ACTIVE_HANDLER: RwLock<Option<Arc<dyn KeyEventHandler>>> = RwLock::new(None);

/// Windows low-level keyboard hook backend.
#[derive(Debug, Default)]
pub struct WindowsKeyboardHook;

impl WindowsKeyboardHook {
    /// Creates a new (uninstalled) backend.
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardHook for WindowsKeyboardHook {
    fn install(&self, handler: Arc<dyn KeyEventHandler>) -> Result<HookHandle, HookError> {
        if HOOK_OWNED.swap(true, Ordering::SeqCst) {
            return Err(HookError::AlreadyInstalled);
        }
        set_handler(Some(handler));

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();
        let join = match thread::Builder::new()
            .name("stratagem-hook-loop".to_string())
            .spawn(move || run_hook_message_loop(ready_tx))
        {
            Ok(join) => join,
            Err(e) => {
                abandon_ownership();
                return Err(HookError::InstallFailed(e.to_string()));
            }
        };

        // Wait until the hook is in place (or failed) so `enable()` can report it.
        let thread_id = match ready_rx.recv() {
            Ok(Ok(thread_id)) => thread_id,
            Ok(Err(reason)) => {
                let _ = join.join();
                abandon_ownership();
                return Err(HookError::InstallFailed(reason));
            }
            Err(_) => {
                let _ = join.join();
                abandon_ownership();
                return Err(HookError::InstallFailed(
                    "hook thread exited before reporting".to_string(),
                ));
            }
        };
        info!(thread_id, "WH_KEYBOARD_LL hook installed");

        Ok(HookHandle::new(move || {
            // Stop consulting the handler first so nothing is suppressed from here on.
            set_handler(None);
            // SAFETY: thread_id belongs to the hook thread, whose message queue
            // was created before it reported ready.
            if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
                error!("failed to post WM_QUIT to hook thread: {e}");
            }
            if join.join().is_err() {
                error!("hook thread panicked during shutdown");
            }
            HOOK_OWNED.store(false, Ordering::SeqCst);
            info!("WH_KEYBOARD_LL hook removed");
        }))
    }
}

fn set_handler(handler: Option<Arc<dyn KeyEventHandler>>) {
    *ACTIVE_HANDLER.write().unwrap_or_else(|e| e.into_inner()) = handler;
}

fn abandon_ownership() {
    set_handler(None);
    HOOK_OWNED.store(false, Ordering::SeqCst);
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready: mpsc::Sender<Result<u32, String>>) {
    let mut msg = MSG::default();

    // SAFETY: PeekMessageW with PM_NOREMOVE only forces creation of this
    // thread's message queue so the owner can post WM_QUIT to it.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    // SAFETY: Low-level hooks need no module handle; the callback runs on this
    // thread, which pumps messages below.
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // SAFETY: GetCurrentThreadId is always safe to call.
    let thread_id = unsafe { GetCurrentThreadId() };
    let _ = ready.send(Ok(thread_id));

    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern; exits on
    // WM_QUIT (0) or error (-1).
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
        if let Err(e) = UnhookWindowsHookEx(hook) {
            error!("UnhookWindowsHookEx failed: {e}");
        }
    }
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    let is_key_down = matches!(w_param.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN);
    let injected = (kbs.flags & LLKHF_INJECTED) != KBDLLHOOKSTRUCT_FLAGS(0);

    if consult_handler(is_key_down, injected) {
        let scan_code = kbs.scanCode as u16;
        let is_extended = (kbs.flags & LLKHF_EXTENDED) != KBDLLHOOKSTRUCT_FLAGS(0);
        let event = KeyDownEvent {
            key: PhysicalKeyId(scan_code),
            vk_code: kbs.vkCode,
            is_extended,
            is_keypad: is_keypad_key(kbs.vkCode, scan_code, is_extended),
        };

        // A panic must not unwind across the FFI boundary.
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| dispatch(&event)))
            .unwrap_or_else(|_| {
                error!("key handler panicked; passing key through");
                HookVerdict::PassThrough
            });
        if verdict == HookVerdict::Suppress {
            return LRESULT(1);
        }
    }

    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

fn dispatch(event: &KeyDownEvent) -> HookVerdict {
    // Clone the handler out so the lock is not held while it runs.
    let handler = ACTIVE_HANDLER
        .read()
        .ok()
        .and_then(|guard| guard.as_ref().map(Arc::clone));
    match handler {
        Some(handler) => handler.on_key_down(event),
        None => HookVerdict::PassThrough,
    }
}
