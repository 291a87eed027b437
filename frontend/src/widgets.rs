//! Small building blocks shared by the side panels and dialogs.

use zoon::events::PointerDown;
use zoon::*;

pub const ON_COLOR: &str = "#22c55e";
pub const OFF_COLOR: &str = "#ef4444";
pub const NEUTRAL_COLOR: &str = "#e2e8f0";

/// Full-width button whose label and background follow a signal.
pub fn state_button<S>(
    state: S,
    label: impl Fn(&S::Item) -> String + 'static,
    color: impl Fn(&S::Item) -> &'static str + 'static,
    on_press: impl FnMut() + 'static,
) -> impl Element
where
    S: Signal + 'static,
    S::Item: Clone + 'static,
{
    let state = state.broadcast();
    Button::new()
        .s(Width::fill())
        .s(Padding::new().x(12).y(8))
        .s(RoundedCorners::all(4))
        .s(Font::new().size(14).weight(FontWeight::Medium).color("#ffffff"))
        .s(Background::new().color_signal(state.signal_ref(color)))
        .label_signal(state.signal_ref(label))
        .on_press(on_press)
}

pub fn plain_button(
    label: &'static str,
    background: &'static str,
    on_press: impl FnMut() + 'static,
) -> impl Element {
    Button::new()
        .s(Padding::new().x(12).y(6))
        .s(RoundedCorners::all(4))
        .s(Font::new().size(13).weight(FontWeight::Medium))
        .s(Background::new().color(background))
        .label(label)
        .on_press(on_press)
}

/// Text field that commits on Enter.
pub fn reading_input(
    label: &'static str,
    placeholder: &'static str,
    width: u32,
    text: impl Signal<Item = String> + Unpin + 'static,
    on_change: impl FnMut(String) + 'static,
    mut on_enter: impl FnMut() + 'static,
) -> impl Element {
    TextInput::new()
        .s(Width::exact(width))
        .s(Padding::new().x(4).y(2))
        .s(Borders::all(Border::new().width(1).color("#cbd5e1")))
        .s(RoundedCorners::all(3))
        .s(Font::new().size(12))
        .label_hidden(label)
        .placeholder(Placeholder::new(placeholder))
        .text_signal(text)
        .on_change(on_change)
        .on_key_down_event(move |event| event.if_key(Key::Enter, || on_enter()))
        // Keeps clicks into the field from starting a pan underneath.
        .update_raw_el(|raw_el| raw_el.event_handler(|event: PointerDown| event.stop_propagation()))
}

/// `label: [input] unit` row.
pub fn labelled_reading(
    label: &'static str,
    unit: Option<&'static str>,
    input: impl Element,
) -> impl Element {
    Row::new()
        .s(Gap::new().x(6))
        .s(Font::new().size(12).color("#475569"))
        .item(El::new().s(Width::exact(36)).child(label))
        .item(input)
        .item(unit.map(|unit| El::new().child(unit)))
}

pub fn section_title(title: &'static str) -> impl Element {
    El::new()
        .s(Font::new().size(12).weight(FontWeight::SemiBold).color("#334155"))
        .child(title)
}

/// Vertical drag handle between two panels.
pub fn divider(
    is_active: impl Signal<Item = bool> + Unpin + 'static,
    mut on_grab: impl FnMut() + 'static,
) -> impl Element {
    El::new()
        .s(Width::exact(4))
        .s(Height::fill())
        .s(Cursor::new(CursorIcon::ColumnResize))
        .s(Background::new().color_signal(is_active.map_bool(|| "#3b82f6", || "#cbd5e1")))
        .update_raw_el(move |raw_el| {
            raw_el.style("user-select", "none").event_handler(move |event: PointerDown| {
                if event.button() == events::MouseButton::Left {
                    on_grab();
                }
            })
        })
}
