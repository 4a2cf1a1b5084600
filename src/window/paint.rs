use windows::Win32::{
    Foundation::{COLORREF, HWND, RECT},
    Graphics::Gdi::{
        BeginPaint, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateSolidBrush, DEFAULT_GUI_FONT,
        DRAW_TEXT_FORMAT, DT_CENTER, DT_END_ELLIPSIS, DT_LEFT, DT_NOPREFIX, DT_RIGHT, DT_SINGLELINE, DT_VCENTER,
        DeleteDC, DeleteObject, DrawTextW, EndPaint, FillRect, GetStockObject, HDC, PAINTSTRUCT, SRCCOPY,
        SelectObject, SetBkMode, SetTextColor, TRANSPARENT,
    },
    UI::WindowsAndMessaging::GetClientRect,
};

use tabelo::{
    app::ApplicationWindow,
    ui::{Rect, UIComponent, dialog::PreferencesDialog, tabs::TabStrip},
};

const CELL_WIDTH: f32 = 96.0;
const CELL_HEIGHT: f32 = 22.0;
const HEADER_WIDTH: f32 = 40.0;

#[derive(Clone, Copy)]
struct Palette {
    window: COLORREF,
    chrome: COLORREF,
    hover: COLORREF,
    checked: COLORREF,
    active_tab: COLORREF,
    sheet: COLORREF,
    grid: COLORREF,
    header: COLORREF,
    text: COLORREF,
    disabled: COLORREF,
    muted: COLORREF,
    shade: COLORREF,
    border: COLORREF,
}

const fn rgb(r: u8, g: u8, b: u8) -> COLORREF {
    COLORREF(r as u32 | (g as u32) << 8 | (b as u32) << 16)
}

const PALETTE: Palette = Palette {
    window: rgb(0xF3, 0xF3, 0xF3),
    chrome: rgb(0xEB, 0xEB, 0xEB),
    hover: rgb(0xDD, 0xE6, 0xF3),
    checked: rgb(0xCC, 0xDA, 0xEE),
    active_tab: rgb(0xFF, 0xFF, 0xFF),
    sheet: rgb(0xFF, 0xFF, 0xFF),
    grid: rgb(0xE1, 0xE1, 0xE1),
    header: rgb(0xF7, 0xF7, 0xF7),
    text: rgb(0x1F, 0x1F, 0x1F),
    disabled: rgb(0xA0, 0xA0, 0xA0),
    muted: rgb(0x60, 0x60, 0x60),
    shade: rgb(0xB8, 0xB8, 0xB8),
    border: rgb(0x8A, 0x8A, 0x8A),
};

/// Paints the whole client area through an off-screen bitmap.
pub fn paint_window(hwnd: HWND, app: &ApplicationWindow, preferences: Option<&PreferencesDialog>) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
    let mut client = RECT::default();
    if unsafe { GetClientRect(hwnd, &mut client) }.is_err() {
        let _ = unsafe { EndPaint(hwnd, &ps) };
        return;
    }
    let width = client.right - client.left;
    let height = client.bottom - client.top;

    unsafe {
        let memory = CreateCompatibleDC(Some(hdc));
        let bitmap = CreateCompatibleBitmap(hdc, width, height);
        let previous_bitmap = SelectObject(memory, bitmap.into());
        let previous_font = SelectObject(memory, GetStockObject(DEFAULT_GUI_FONT));
        SetBkMode(memory, TRANSPARENT);

        let canvas = Canvas { dc: memory };
        canvas.fill(&client, PALETTE.window);
        paint_shell(&canvas, app);
        if let Some(preferences) = preferences {
            canvas.fill(&client, PALETTE.shade);
            paint_preferences(&canvas, preferences);
        }

        let _ = BitBlt(hdc, 0, 0, width, height, Some(memory), 0, 0, SRCCOPY);
        SelectObject(memory, previous_font);
        SelectObject(memory, previous_bitmap);
        let _ = DeleteObject(bitmap.into());
        let _ = DeleteDC(memory);
        let _ = EndPaint(hwnd, &ps);
    }
}

struct Canvas {
    dc: HDC,
}

impl Canvas {
    fn fill(&self, rect: &RECT, color: COLORREF) {
        unsafe {
            let brush = CreateSolidBrush(color);
            FillRect(self.dc, rect, brush);
            let _ = DeleteObject(brush.into());
        }
    }

    fn fill_rect(&self, rect: Rect, color: COLORREF) {
        if !rect.is_empty() {
            self.fill(&to_rect(rect), color);
        }
    }

    fn text(&self, text: &str, rect: Rect, color: COLORREF, format: DRAW_TEXT_FORMAT) {
        if text.is_empty() || rect.is_empty() {
            return;
        }
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut bounds = to_rect(rect);
        unsafe {
            SetTextColor(self.dc, color);
            DrawTextW(
                self.dc,
                &mut wide,
                &mut bounds,
                format | DT_SINGLELINE | DT_VCENTER | DT_NOPREFIX | DT_END_ELLIPSIS,
            );
        }
    }
}

fn to_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.x.round() as i32,
        top: rect.y.round() as i32,
        right: (rect.x + rect.width).round() as i32,
        bottom: (rect.y + rect.height).round() as i32,
    }
}

fn inset(rect: Rect, dx: f32) -> Rect {
    Rect {
        x: rect.x + dx,
        width: (rect.width - dx * 2.0).max(0.0),
        ..rect
    }
}

fn paint_shell(canvas: &Canvas, app: &ApplicationWindow) {
    paint_toolbars(canvas, app);
    if app.documents().count() == 0 {
        let area = app.document_tabs().content_rect();
        canvas.text(
            "No documents are open",
            area,
            PALETTE.muted,
            DT_CENTER,
        );
    } else {
        paint_sheet(canvas, app.sheet_area());
        paint_tab_strip(canvas, app.sheet_tabs());
    }
    paint_tab_strip(canvas, app.document_tabs());
    paint_statusbar(canvas, app);
}

fn paint_toolbars(canvas: &Canvas, app: &ApplicationWindow) {
    let dock = app.toolbars();
    for toolbar in dock.toolbars.iter().filter(|toolbar| toolbar.visible) {
        canvas.fill_rect(toolbar.bounds, PALETTE.chrome);
        for separator in &toolbar.separators {
            canvas.fill_rect(*separator, PALETTE.grid);
        }
        for button in &toolbar.buttons {
            if button.checked {
                canvas.fill_rect(button.rect, PALETTE.checked);
            } else if dock.hovered == Some(button.action) && button.enabled {
                canvas.fill_rect(button.rect, PALETTE.hover);
            }
            let label = if button.label.is_empty() {
                button.icon_glyph
            } else {
                button.label.as_str()
            };
            let color = if button.enabled { PALETTE.text } else { PALETTE.disabled };
            canvas.text(label, button.rect, color, DT_CENTER);
        }
    }
}

fn paint_tab_strip(canvas: &Canvas, strip: &TabStrip) {
    if !strip.is_visible() {
        return;
    }
    canvas.fill_rect(strip.strip_rect(), PALETTE.chrome);

    for (slot, rect) in strip.tab_rects.iter().enumerate() {
        let index = strip.overflow_offset + slot;
        let Some(tab) = strip.tabs.get(index) else {
            continue;
        };
        if index == strip.active {
            canvas.fill_rect(*rect, PALETTE.active_tab);
        } else if strip.hovered == Some(index) {
            canvas.fill_rect(*rect, PALETTE.hover);
        }
        let mut label = inset(*rect, 8.0);
        if strip.closable {
            label.width = (label.width - 16.0).max(0.0);
        }
        let title = if tab.modified { format!("{} *", tab.title) } else { tab.title.clone() };
        canvas.text(&title, label, PALETTE.text, DT_LEFT);
        if strip.closable
            && let Some(close) = strip.close_rects.get(slot)
        {
            canvas.text("\u{00d7}", *close, PALETTE.muted, DT_CENTER);
        }
    }

    if strip.show_new_tab_button {
        canvas.text("+", strip.new_tab_rect, PALETTE.text, DT_CENTER);
    }
    canvas.text("\u{2039}", strip.overflow_left_rect, PALETTE.text, DT_CENTER);
    canvas.text("\u{203a}", strip.overflow_right_rect, PALETTE.text, DT_CENTER);
}

/// Empty grid with column letters and row numbers.
fn paint_sheet(canvas: &Canvas, area: Rect) {
    if area.is_empty() {
        return;
    }
    canvas.fill_rect(area, PALETTE.sheet);
    canvas.fill_rect(Rect { height: CELL_HEIGHT, ..area }, PALETTE.header);
    canvas.fill_rect(Rect { width: HEADER_WIDTH, ..area }, PALETTE.header);

    let mut x = area.x + HEADER_WIDTH;
    let mut column = 0usize;
    while x < area.x + area.width {
        canvas.fill_rect(Rect { x, width: 1.0, ..area }, PALETTE.grid);
        let header = Rect {
            x,
            y: area.y,
            width: CELL_WIDTH,
            height: CELL_HEIGHT,
        };
        canvas.text(&column_name(column), header, PALETTE.muted, DT_CENTER);
        x += CELL_WIDTH;
        column += 1;
    }

    let mut y = area.y + CELL_HEIGHT;
    let mut row = 1usize;
    while y < area.y + area.height {
        canvas.fill_rect(Rect { y, height: 1.0, ..area }, PALETTE.grid);
        let header = Rect {
            x: area.x,
            y,
            width: HEADER_WIDTH,
            height: CELL_HEIGHT,
        };
        canvas.text(&row.to_string(), header, PALETTE.muted, DT_CENTER);
        y += CELL_HEIGHT;
        row += 1;
    }
}

fn paint_statusbar(canvas: &Canvas, app: &ApplicationWindow) {
    let statusbar = app.statusbar();
    if !statusbar.is_visible() {
        return;
    }
    let bounds = statusbar.bounds();
    canvas.fill_rect(bounds, PALETTE.chrome);
    canvas.text(statusbar.left_text(), inset(bounds, 8.0), PALETTE.text, DT_LEFT);
    canvas.text(&statusbar.right_text(), inset(bounds, 8.0), PALETTE.muted, DT_RIGHT);
}

fn paint_preferences(canvas: &Canvas, dialog: &PreferencesDialog) {
    let bounds = dialog.bounds();
    canvas.fill_rect(
        Rect {
            x: bounds.x - 1.0,
            y: bounds.y - 1.0,
            width: bounds.width + 2.0,
            height: bounds.height + 2.0,
        },
        PALETTE.border,
    );
    canvas.fill_rect(bounds, PALETTE.window);
    canvas.text(dialog.title(), dialog.header_rect(), PALETTE.text, DT_LEFT);

    let search = dialog.search_rect();
    canvas.fill_rect(search, PALETTE.sheet);
    if dialog.search_query().is_empty() {
        canvas.text("Type to search settings", inset(search, 8.0), PALETTE.disabled, DT_LEFT);
    } else {
        canvas.text(dialog.search_query(), inset(search, 8.0), PALETTE.text, DT_LEFT);
    }

    for (index, category) in dialog.visible_categories().into_iter().enumerate() {
        let rect = dialog.category_rect(index);
        if category == dialog.selected_category() {
            canvas.fill_rect(rect, PALETTE.checked);
        }
        canvas.text(category.title(), inset(rect, 8.0), PALETTE.text, DT_LEFT);
    }

    for (index, hit) in dialog.visible_setting_hits().into_iter().enumerate() {
        let row = dialog.setting_rect(index);
        canvas.fill_rect(Rect { height: 1.0, ..row }, PALETTE.grid);
        let (upper, lower) = split_rows(inset(row, 8.0));
        let value = dialog.value_label(hit.setting_key).unwrap_or_default();
        canvas.text(hit.title, upper, PALETTE.text, DT_LEFT);
        canvas.text(&value, upper, PALETTE.muted, DT_RIGHT);
        canvas.text(hit.summary, lower, PALETTE.muted, DT_LEFT);
    }

    if dialog.is_dirty() {
        let hint = Rect {
            x: bounds.x + 16.0,
            width: (dialog.ok_rect().x - bounds.x - 24.0).max(0.0),
            ..dialog.ok_rect()
        };
        canvas.text("Changes are applied when you press OK.", hint, PALETTE.muted, DT_LEFT);
    }
    for (label, rect) in [("OK", dialog.ok_rect()), ("Cancel", dialog.cancel_rect())] {
        canvas.fill_rect(rect, PALETTE.chrome);
        canvas.text(label, rect, PALETTE.text, DT_CENTER);
    }
}

fn split_rows(rect: Rect) -> (Rect, Rect) {
    let half = rect.height / 2.0;
    (
        Rect { height: half, ..rect },
        Rect {
            y: rect.y + half,
            height: half,
            ..rect
        },
    )
}

/// Spreadsheet column label: A..Z, AA..AZ, ...
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.iter().rev().map(|byte| char::from(*byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_roll_over() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }
}
