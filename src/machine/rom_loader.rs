//! TIFL/v2u flash-image loader.
//!
//! Grounded on `examples/original_source/v200.c`'s `read_rom` and on the
//! teacher's ROM-loading convention (`c64_emu/banks/system_rom.rs`'s
//! `set(Option<&[u8]>)` pattern, adapted here to a fallible load since an
//! absent/malformed v2u is a fatal configuration error rather than "fall
//! back to a stub").

use super::flash::FlashBank;

const HEADER_LEN: usize = 78;
const MAGIC: &[u8; 8] = b"**TIFL**";
const LENGTH_OFFSET: usize = 74;
const PAYLOAD_OFFSET: u32 = 0x12000;
const BOOT_VECTOR_SRC: u32 = 0x12088;
const BOOT_VECTOR_LEN: usize = 256;

/// Parse and validate a v2u image, then seed `flash` from it.
///
/// On success the flash bank holds: `0xFF` everywhere, the payload at
/// `0x12000`, and the boot vector table (copied from `0x12088`) at
/// `0x00000`. On failure `flash` is left untouched.
pub fn load(data: &[u8], flash: &mut FlashBank) -> Result<(), String> {
    if data.len() < HEADER_LEN {
        return Err("v2u header truncated".to_string());
    }
    if &data[0..8] != MAGIC {
        return Err("invalid v2u magic".to_string());
    }

    let length_bytes: [u8; 4] = data[LENGTH_OFFSET..LENGTH_OFFSET + 4]
        .try_into()
        .expect("slice is exactly 4 bytes");
    let payload_len = u32::from_le_bytes(length_bytes);

    if payload_len & 0xFF00_0000 != 0 {
        return Err(format!("unreasonable flash size (got {payload_len:#010x})"));
    }
    let flash_size = super::decoder::FLASH_SIZE;
    if payload_len.saturating_add(PAYLOAD_OFFSET) > flash_size {
        return Err(format!("unreasonable flash size (got {payload_len:#010x})"));
    }

    let payload_start = HEADER_LEN;
    let payload_end = payload_start
        .checked_add(payload_len as usize)
        .ok_or_else(|| "payload length overflow".to_string())?;
    if data.len() < payload_end {
        return Err("v2u payload truncated".to_string());
    }

    flash.fill_erased();
    let raw = flash.raw_mut();
    raw[PAYLOAD_OFFSET as usize..PAYLOAD_OFFSET as usize + payload_len as usize]
        .copy_from_slice(&data[payload_start..payload_end]);

    // Seed the boot vector table (SP/PC) from the payload's copy of it.
    // The hardware-parameter block at flash+0x100 is intentionally left
    // at 0xFF; firmware tolerates it (see SPEC_FULL.md §4.7).
    let (dst, src_region) = {
        let src_start = BOOT_VECTOR_SRC as usize;
        let src = raw[src_start..src_start + BOOT_VECTOR_LEN].to_vec();
        (0usize, src)
    };
    raw[dst..dst + BOOT_VECTOR_LEN].copy_from_slice(&src_region);

    Ok(())
}
