//! Host keysym -> logical key id table (§6), and the `minifb`-backed
//! display/input sinks.
//!
//! Logical key ids follow `examples/original_source/v200.c`'s
//! `sdl_to_ti_kbd` table exactly, re-expressed against `minifb::Key`.
//! Keys with no host equivalent (hand, ln, sin/cos/tan, mode, negate, ^)
//! are unreachable, matching the original.

use minifb::Key;

/// Map a host key to a logical id in 0..80, or `None` if unmapped.
pub fn key_to_id(key: Key) -> Option<usize> {
    use Key::*;
    Some(match key {
        Down => 0,
        Right => 1,
        Up => 2,
        Left => 3,
        // hand = 4, unreachable
        LeftShift | RightShift => 5,
        LeftAlt | RightAlt => 6, // diamond
        LeftCtrl | RightCtrl => 7, // 2nd

        Key3 => 8,
        Key2 => 9,
        Key1 => 10,
        F8 => 11,
        W => 12,
        S => 13,
        Z => 14,
        // no key @ 15

        Key6 => 16,
        Key5 => 17,
        Key4 => 18,
        F3 => 19,
        E => 20,
        D => 21,
        X => 22,
        // no key @ 23

        Key9 => 24,
        Key8 => 25,
        Key7 => 26,
        F7 => 27,
        R => 28,
        F => 29,
        C => 30,
        Backslash => 31, // store

        Comma => 32,
        RightBracket => 33, // paren right
        LeftBracket => 34,  // paren left
        F2 => 35,
        T => 36,
        G => 37,
        V => 38,
        Space => 39,

        // tan = 40, cos = 41, sin = 42, unreachable
        F6 => 43,
        Y => 44,
        H => 45,
        B => 46,
        NumPadSlash => 47,

        P => 48,
        NumPadEnter => 49,
        // ln = 50, unreachable
        F1 => 51,
        U => 52,
        J => 53,
        N => 54,
        // ^ = 55, unreachable

        NumPadAsterisk => 56,
        Insert => 57, // apps
        Delete => 58, // clear
        F5 => 59,
        I => 60,
        K => 61,
        M => 62,
        Equal => 63,

        // no key @ 64
        Escape => 65,
        // mode = 66, unreachable
        NumPadPlus => 67,
        O => 68,
        L => 69,
        Slash => 70, // theta
        Backspace => 71,

        // negate = 72, unreachable
        Period => 73,
        Key0 => 74,
        F4 => 75,
        Q => 76,
        A => 77,
        Enter => 78,
        Minus | NumPadMinus => 79,

        _ => return None,
    })
}
