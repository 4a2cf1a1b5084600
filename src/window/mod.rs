use std::{ffi::c_void, mem::size_of, time::Instant};

use tracing::{debug, info, warn};
use widestring::U16CString;
use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::{ClientToScreen, GetMonitorInfoW, InvalidateRect, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            HiDpi::{DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, GetDpiForWindow, SetProcessDpiAwarenessContext},
            WindowsAndMessaging::{
                CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow,
                DispatchMessageW, GWL_STYLE, GWLP_USERDATA, GetClientRect, GetMessageW, GetSystemMetrics,
                GetWindowLongPtrW, GetWindowPlacement, HWND_TOP, IDC_ARROW, KillTimer, LoadCursorW, MSG,
                PostMessageW, PostQuitMessage, RegisterClassExW, SM_CXSCREEN, SM_CYSCREEN, SW_SHOW,
                SW_SHOWMAXIMIZED, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOOWNERZORDER, SWP_NOSIZE,
                SWP_NOZORDER, SetTimer, SetWindowLongPtrW, SetWindowPlacement, SetWindowPos, SetWindowTextW,
                ShowWindow, TranslateMessage, WINDOW_EX_STYLE, WINDOWPLACEMENT, WM_APP, WM_CHAR, WM_CLOSE, WM_COMMAND,
                WM_CREATE, WM_DESTROY, WM_DPICHANGED, WM_ERASEBKGND, WM_KEYDOWN, WM_LBUTTONDOWN, WM_LBUTTONUP,
                WM_MBUTTONUP, WM_MOUSEMOVE, WM_NCCREATE, WM_NCDESTROY, WM_PAINT, WM_RBUTTONUP, WM_SIZE,
                WM_TIMER, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
            },
        },
    },
    core::{PCWSTR, w},
};

use tabelo::{
    app::{ApplicationWindow, ShellRequest, actions::ActionId},
    document::DocumentUrl,
    error::Result,
    settings::{SettingsStore, schema::WindowGeometry},
    ui::{
        InputEvent, Point, UIComponent,
        dialog::{PreferencesDialog, PreferencesOutcome},
    },
    workspace::window::DocumentWindow,
};
use clipboard::SystemClipboard;
use dialogs::TaskDialogPrompter;
use input::{KeyModifiers, document_cycle, point_from_lparam, resolve_shortcut};
use menu::{NativeMenuBar, track_system_menu};

pub mod clipboard;
mod dialogs;
mod input;
mod menu;
mod paint;

const TICK_TIMER_ID: usize = 1;
const TICK_INTERVAL_MS: u32 = 250;
const WM_APP_EXIT: u32 = WM_APP + 1;

/// Window style and placement to return to when leaving full screen.
struct Restore {
    style: isize,
    placement: WINDOWPLACEMENT,
}

struct WindowState {
    app: ApplicationWindow,
    menubar: Option<NativeMenuBar>,
    startup: Vec<DocumentUrl>,
    restore: Option<Restore>,
    /// Preferences drawn over the client area while open.
    preferences: Option<PreferencesDialog>,
    dpi: f32,
    /// Set while a modal dialog pumps messages on top of a handler.
    modal: bool,
}

/// Creates the main window and runs the message loop until it closes.
pub fn run(store: SettingsStore, startup: Vec<DocumentUrl>) -> Result<()> {
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let hmodule = unsafe { GetModuleHandleW(None)? };
    let hinstance = HINSTANCE(hmodule.0);
    let class_name = w!("TabeloMainWindow");

    let wc = WNDCLASSEXW {
        cbSize: size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance,
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
        lpszClassName: class_name,
        ..Default::default()
    };
    unsafe {
        let _ = RegisterClassExW(&wc);
    }

    let app = ApplicationWindow::new(store, dirs::home_dir(), Instant::now());
    let geometry = app.geometry().unwrap_or_else(|| {
        WindowGeometry::centered_in(unsafe { GetSystemMetrics(SM_CXSCREEN) }, unsafe {
            GetSystemMetrics(SM_CYSCREEN)
        })
    });
    debug!(?geometry, "initial window geometry");

    let state = Box::new(WindowState {
        app,
        menubar: None,
        startup,
        restore: None,
        preferences: None,
        dpi: 96.0,
        modal: false,
    });
    let state_ptr = Box::into_raw(state);

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class_name,
            w!("Tabelo"),
            WS_OVERLAPPEDWINDOW,
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
            None,
            None,
            Some(hinstance),
            Some(state_ptr as *const c_void),
        )?
    };

    unsafe {
        let _ = ShowWindow(hwnd, if geometry.maximized { SW_SHOWMAXIMIZED } else { SW_SHOW });
    }
    info!("main window shown");

    let mut message = MSG::default();
    while unsafe { GetMessageW(&mut message, None, 0, 0) }.as_bool() {
        unsafe {
            let _ = TranslateMessage(&message);
            DispatchMessageW(&message);
        }
    }
    Ok(())
}

unsafe fn state_from_hwnd(hwnd: HWND) -> Option<&'static mut WindowState> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut WindowState;
    if ptr.is_null() { None } else { Some(unsafe { &mut *ptr }) }
}

fn client_size(hwnd: HWND) -> (f32, f32) {
    let mut client = RECT::default();
    let _ = unsafe { GetClientRect(hwnd, &mut client) };
    (
        (client.right - client.left).max(0) as f32,
        (client.bottom - client.top).max(0) as f32,
    )
}

fn relayout(hwnd: HWND, state: &mut WindowState) {
    let (width, height) = client_size(hwnd);
    state.app.layout(width, height, state.dpi);
    if let Some(preferences) = &mut state.preferences {
        preferences.place(width, height, state.dpi);
    }
}

fn invalidate(hwnd: HWND) {
    let _ = unsafe { InvalidateRect(Some(hwnd), None, false) };
}

/// Brings the native chrome in line with the application state.
fn sync_chrome(hwnd: HWND, state: &mut WindowState) {
    if let Some(menubar) = &mut state.menubar {
        if let Err(err) = menubar.set_visible(hwnd, state.app.is_menubar_visible()) {
            warn!(%err, "failed to toggle the menu bar");
        }
        menubar.sync(hwnd, state.app.actions());
    }
    apply_full_screen(hwnd, state);

    if let Ok(title) = U16CString::from_str(state.app.window_title()) {
        let _ = unsafe { SetWindowTextW(hwnd, PCWSTR(title.as_ptr())) };
    }
    relayout(hwnd, state);
    invalidate(hwnd);
}

fn apply_full_screen(hwnd: HWND, state: &mut WindowState) {
    let wanted = state.app.is_full_screen();
    match (wanted, state.restore.take()) {
        (true, None) => {
            let mut placement = WINDOWPLACEMENT {
                length: size_of::<WINDOWPLACEMENT>() as u32,
                ..Default::default()
            };
            let _ = unsafe { GetWindowPlacement(hwnd, &mut placement) };
            let style = unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) };

            let mut monitor = MONITORINFO {
                cbSize: size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            let hmonitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
            if !unsafe { GetMonitorInfoW(hmonitor, &mut monitor) }.as_bool() {
                warn!("monitor information unavailable, staying windowed");
                return;
            }
            let area = monitor.rcMonitor;
            unsafe {
                SetWindowLongPtrW(hwnd, GWL_STYLE, style & !(WS_OVERLAPPEDWINDOW.0 as isize));
                let _ = SetWindowPos(
                    hwnd,
                    Some(HWND_TOP),
                    area.left,
                    area.top,
                    area.right - area.left,
                    area.bottom - area.top,
                    SWP_NOOWNERZORDER | SWP_FRAMECHANGED,
                );
            }
            state.restore = Some(Restore { style, placement });
            debug!("entered full screen");
        }
        (false, Some(restore)) => {
            unsafe {
                SetWindowLongPtrW(hwnd, GWL_STYLE, restore.style);
                let _ = SetWindowPlacement(hwnd, &restore.placement);
                let _ = SetWindowPos(
                    hwnd,
                    None,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOOWNERZORDER | SWP_FRAMECHANGED,
                );
            }
            debug!("left full screen");
        }
        (_, restore) => state.restore = restore,
    }
}

/// Stores the normal (non-maximized, non-full-screen) placement.
fn record_geometry(hwnd: HWND, state: &mut WindowState) {
    let placement = match &state.restore {
        Some(restore) => restore.placement,
        None => {
            let mut placement = WINDOWPLACEMENT {
                length: size_of::<WINDOWPLACEMENT>() as u32,
                ..Default::default()
            };
            if unsafe { GetWindowPlacement(hwnd, &mut placement) }.is_err() {
                return;
            }
            placement
        }
    };
    let normal = placement.rcNormalPosition;
    state.app.set_geometry(WindowGeometry {
        x: normal.left,
        y: normal.top,
        width: normal.right - normal.left,
        height: normal.bottom - normal.top,
        maximized: placement.showCmd == SW_SHOWMAXIMIZED.0 as u32,
    });
}

/// Carries out host requests, then refreshes the chrome.
fn after_change(hwnd: HWND, state: &mut WindowState) {
    loop {
        let requests = state.app.take_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            if let Err(err) = handle_request(hwnd, state, request) {
                warn!(%err, ?request, "request failed");
            }
        }
    }
    sync_chrome(hwnd, state);
}

fn handle_request(hwnd: HWND, state: &mut WindowState, request: ShellRequest) -> Result<()> {
    state.modal = true;
    let result = match request {
        ShellRequest::ShowAbout => dialogs::show_about(hwnd),
        ShellRequest::ShowColophon => dialogs::show_colophon(hwnd),
        ShellRequest::ShowPreferences => {
            if state.preferences.is_none() {
                let mut preferences = PreferencesDialog::new();
                preferences.open(state.app.current_settings());
                let (width, height) = client_size(hwnd);
                preferences.place(width, height, state.dpi);
                state.preferences = Some(preferences);
                debug!("preferences opened");
            }
            Ok(())
        }
        ShellRequest::ShowOpenDialog => {
            let urls = dialogs::pick_open_files(hwnd);
            state.app.open_documents(urls);
            Ok(())
        }
        ShellRequest::Close => {
            unsafe { PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0))? };
            Ok(())
        }
        ShellRequest::Exit => {
            unsafe { PostMessageW(Some(hwnd), WM_APP_EXIT, WPARAM(0), LPARAM(0))? };
            Ok(())
        }
    };
    state.modal = false;
    result
}

fn run_action(hwnd: HWND, state: &mut WindowState, action: ActionId) {
    debug!(?action, "running action");
    let mut prompter = TaskDialogPrompter::new(hwnd);
    let mut clipboard = SystemClipboard::new(hwnd);
    state.modal = true;
    let result = state.app.trigger(action, &mut prompter, &mut clipboard);
    state.modal = false;
    if let Err(err) = result {
        warn!(%err, ?action, "action failed");
    }
    after_change(hwnd, state);
}

/// Feeds a mouse event to the toolbars and both tab strips.
fn route_input(hwnd: HWND, state: &mut WindowState, event: InputEvent) -> bool {
    let app = &mut state.app;
    let mut handled = app.toolbars_mut().handle_input(&event);
    handled |= app.document_tabs_mut().handle_input(&event);
    handled |= app.sheet_tabs_mut().handle_input(&event);

    let pending = app.toolbars_mut().pending_action.take();
    for action in app.document_tabs_mut().take_actions() {
        app.handle_document_tab(action);
    }
    for action in app.sheet_tabs_mut().take_actions() {
        app.handle_sheet_tab(action);
    }

    match pending {
        Some(action) => run_action(hwnd, state, action),
        None if handled => after_change(hwnd, state),
        None => {}
    }
    handled
}

/// Feeds input to the open preferences and applies the draft once it closes.
/// Mouse input never reaches the shell while the dialog is open.
fn route_preferences_input(hwnd: HWND, state: &mut WindowState, event: InputEvent) -> bool {
    let Some(preferences) = &mut state.preferences else {
        return false;
    };
    let handled = preferences.handle_input(&event);
    match preferences.take_outcome() {
        Some(outcome) => {
            state.preferences = None;
            if let PreferencesOutcome::Accepted(settings) = outcome
                && let Err(err) = state.app.apply_preferences(*settings)
            {
                warn!(%err, "failed to apply preferences");
            }
            debug!("preferences closed");
            after_change(hwnd, state);
        }
        None if handled => invalidate(hwnd),
        None => {}
    }
    handled || !matches!(event, InputEvent::KeyDown(_) | InputEvent::Char(_))
}

/// Right click on a document tab opens that document's own menu.
fn show_document_menu(hwnd: HWND, state: &mut WindowState, point: Point) -> bool {
    let Some(index) = state.app.document_tabs().tab_hit_test(point) else {
        return false;
    };
    let Some((id, items)) = state
        .app
        .documents()
        .windows()
        .get(index)
        .map(|window| (DocumentWindow::id(window), window.system_menu()))
    else {
        return false;
    };

    let mut screen = POINT {
        x: point.x as i32,
        y: point.y as i32,
    };
    let _ = unsafe { ClientToScreen(hwnd, &mut screen) };
    match track_system_menu(hwnd, &items, screen) {
        Ok(Some(action)) => {
            let mut prompter = TaskDialogPrompter::new(hwnd);
            let mut clipboard = SystemClipboard::new(hwnd);
            state.modal = true;
            let result = state
                .app
                .trigger_window_action(id, action, &mut prompter, &mut clipboard);
            state.modal = false;
            if let Err(err) = result {
                warn!(%err, ?action, "document menu action failed");
            }
            after_change(hwnd, state);
        }
        Ok(None) => {}
        Err(err) => warn!(%err, "failed to show the document menu"),
    }
    true
}

unsafe extern "system" fn window_proc(hwnd: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match message {
        WM_NCCREATE => {
            let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
            let state_ptr = create_struct.lpCreateParams as *mut WindowState;
            unsafe {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, state_ptr as isize);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_CREATE => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) } {
                state.dpi = unsafe { GetDpiForWindow(hwnd) }.max(96) as f32;
                match NativeMenuBar::build(state.app.menus(), state.app.actions()) {
                    Ok(menubar) => state.menubar = Some(menubar),
                    Err(err) => warn!(%err, "failed to build the menu bar"),
                }
                let startup = std::mem::take(&mut state.startup);
                if !startup.is_empty() {
                    info!(count = startup.len(), "opening documents from the command line");
                    state.app.open_documents(startup);
                }
                unsafe { SetTimer(Some(hwnd), TICK_TIMER_ID, TICK_INTERVAL_MS, None) };
                sync_chrome(hwnd, state);
            }
            LRESULT(0)
        }
        WM_SIZE => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) } {
                let width = (lparam.0 as u32 & 0xFFFF) as f32;
                let height = ((lparam.0 as u32 >> 16) & 0xFFFF) as f32;
                state.app.layout(width, height, state.dpi);
                invalidate(hwnd);
            }
            LRESULT(0)
        }
        WM_DPICHANGED => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) } {
                state.dpi = (wparam.0 as u32 & 0xFFFF) as f32;

                let suggested = lparam.0 as *const RECT;
                if !suggested.is_null() {
                    let suggested = unsafe { *suggested };
                    let _ = unsafe {
                        SetWindowPos(
                            hwnd,
                            None,
                            suggested.left,
                            suggested.top,
                            suggested.right - suggested.left,
                            suggested.bottom - suggested.top,
                            SWP_NOZORDER | SWP_NOACTIVATE,
                        )
                    };
                }
                relayout(hwnd, state);
            }
            invalidate(hwnd);
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == TICK_TIMER_ID => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && !state.modal
                && state.app.tick(Instant::now())
            {
                invalidate(hwnd);
            }
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1),
        WM_PAINT => {
            match unsafe { state_from_hwnd(hwnd) } {
                Some(state) if !state.modal => paint::paint_window(hwnd, &state.app, state.preferences.as_ref()),
                _ => return unsafe { DefWindowProcW(hwnd, message, wparam, lparam) },
            }
            LRESULT(0)
        }
        WM_COMMAND => {
            let command = (wparam.0 & 0xFFFF) as u16;
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && let Some(action) = ActionId::from_command_id(command)
            {
                if state.preferences.is_some() {
                    debug!(?action, "ignoring menu command while preferences are open");
                } else {
                    run_action(hwnd, state, action);
                }
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_KEYDOWN => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && state.preferences.is_some()
            {
                route_preferences_input(hwnd, state, InputEvent::KeyDown(wparam.0 as u32));
                return LRESULT(0);
            }
            let (vk, modifiers) = (wparam.0 as u32, KeyModifiers::current());
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && let Some(forward) = document_cycle(vk, modifiers)
            {
                if state.app.cycle_documents(forward) {
                    sync_chrome(hwnd, state);
                }
                return LRESULT(0);
            }
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && let Some(action) = resolve_shortcut(state.app.actions(), vk, modifiers)
            {
                run_action(hwnd, state, action);
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_CHAR => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && let Some(ch) = char::from_u32(wparam.0 as u32)
                && route_preferences_input(hwnd, state, InputEvent::Char(ch))
            {
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_MOUSEMOVE | WM_LBUTTONDOWN | WM_LBUTTONUP | WM_MBUTTONUP => {
            let point = point_from_lparam(lparam);
            let event = match message {
                WM_MOUSEMOVE => InputEvent::MouseMove(point),
                WM_LBUTTONDOWN => InputEvent::MouseDown(point),
                WM_LBUTTONUP => InputEvent::MouseUp(point),
                _ => InputEvent::MiddleClick(point),
            };
            if let Some(state) = unsafe { state_from_hwnd(hwnd) } {
                let handled = if state.preferences.is_some() {
                    route_preferences_input(hwnd, state, event)
                } else {
                    route_input(hwnd, state, event)
                };
                if handled {
                    return LRESULT(0);
                }
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_RBUTTONUP => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && state.preferences.is_none()
                && show_document_menu(hwnd, state, point_from_lparam(lparam))
            {
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_CLOSE => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) } {
                record_geometry(hwnd, state);
                let mut prompter = TaskDialogPrompter::new(hwnd);
                state.modal = true;
                let quitting = state.app.request_quit(&mut prompter);
                state.modal = false;
                debug!(quitting, "close requested");
                after_change(hwnd, state);
                return LRESULT(0);
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        WM_APP_EXIT => {
            let _ = unsafe { DestroyWindow(hwnd) };
            LRESULT(0)
        }
        WM_DESTROY => {
            if let Some(state) = unsafe { state_from_hwnd(hwnd) }
                && let Some(menubar) = &mut state.menubar
            {
                menubar.destroy_if_detached();
            }
            let _ = unsafe { KillTimer(Some(hwnd), TICK_TIMER_ID) };
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        WM_NCDESTROY => {
            let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut WindowState;
            if !ptr.is_null() {
                unsafe {
                    let _ = Box::from_raw(ptr);
                    SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                }
            }
            unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
        }
        _ => unsafe { DefWindowProcW(hwnd, message, wparam, lparam) },
    }
}
