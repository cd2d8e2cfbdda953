//! RDRAM byte order, hidden bits and bounds; TMEM wrapping; image export.

use rdp_memory::{snapshot, Rdram, Tmem};
use rdp_registers::TexelSize;
use rdp_twin_core::RdpError;

// ============================================================================
// RDRAM
// ============================================================================

mod rdram_tests {
    use super::*;

    #[test]
    fn words_are_big_endian() {
        let mut ram = Rdram::new(0x100);
        ram.write_idx32(1, 0xDEAD_BABE);
        assert_eq!(&ram.as_bytes()[4..8], &[0xDE, 0xAD, 0xBA, 0xBE]);
        assert_eq!(ram.read_idx16(2), 0xDEAD);
        assert_eq!(ram.read_idx16(3), 0xBABE);
        assert_eq!(ram.read_idx8(7), 0xBE);
    }

    #[test]
    fn out_of_range_reads_zero_and_writes_drop() {
        let mut ram = Rdram::new(0x10);
        ram.write_idx32(4, 0xFFFF_FFFF);
        ram.write_idx16(8, 0xFFFF);
        ram.write_idx8(0x10, 0xFF);
        assert!(ram.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(ram.read_idx32(4), 0);
        assert_eq!(ram.read_pair16(0x100), (0, 0));
    }

    #[test]
    fn addresses_wrap_at_sixteen_megabytes() {
        let mut ram = Rdram::new(0x100);
        ram.write_idx8(0x0100_0010, 0x5A);
        assert_eq!(ram.read_idx8(0x10), 0x5A, "got {:#04x}", ram.read_idx8(0x10));
    }

    #[test]
    fn init_sets_hidden_plane() {
        let mut ram = Rdram::new(0x20);
        assert_eq!(ram.hidden(0), 0);
        ram.init();
        assert_eq!(ram.read_pair16(5), (0, 3));
    }

    #[test]
    fn pair_writes_store_hidden_bits() {
        let mut ram = Rdram::new(0x40);
        ram.write_pair16(3, 0x1234, 2);
        assert_eq!(ram.read_pair16(3), (0x1234, 2));

        ram.write_pair32(2, 0xAABB_CCDD, 1, 3);
        assert_eq!(ram.read_pair16(4), (0xAABB, 1));
        assert_eq!(ram.read_pair16(5), (0xCCDD, 3));

        // Even byte leaves the hidden pair alone, odd byte replaces it.
        ram.write_pair8(0x10, 0x11, 0);
        assert_eq!(ram.hidden(8), 0);
        ram.write_pair8(0x21, 0x22, 2);
        assert_eq!(ram.hidden(0x10), 2);
        assert_eq!(ram.read_idx8(0x21), 0x22);
    }

    #[test]
    fn load_and_slice_check_bounds() {
        let mut ram = Rdram::new(0x20);
        ram.load(0x18, &[1, 2, 3, 4]).expect("in range");
        assert_eq!(ram.slice(0x18, 4).expect("in range"), &[1, 2, 3, 4]);

        let err = ram.load(0x1E, &[0; 4]).unwrap_err();
        assert!(matches!(err, RdpError::AddressOutOfRange { address: 0x1E }));
        assert!(ram.slice(0x20, 1).is_err());
    }
}

// ============================================================================
// TMEM
// ============================================================================

mod tmem_tests {
    use super::*;

    #[test]
    fn halfwords_are_big_endian_and_aligned() {
        let mut tmem = Tmem::new();
        tmem.write16(0x11, 0xBEEF);
        assert_eq!(tmem.read8(0x10), 0xBE);
        assert_eq!(tmem.read8(0x11), 0xEF);
        assert_eq!(tmem.read16_idx(8), 0xBEEF);
    }

    #[test]
    fn addresses_wrap_at_four_kilobytes() {
        let mut tmem = Tmem::new();
        tmem.write8(0x1003, 0x77);
        assert_eq!(tmem.read8(3), 0x77);
        tmem.clear();
        assert_eq!(tmem.read8(3), 0);
    }
}

// ============================================================================
// Colour image export
// ============================================================================

mod snapshot_tests {
    use super::*;

    #[test]
    fn rgba32_pixels_copy_through() {
        let mut ram = Rdram::new(0x1000);
        ram.write_idx32(0x100 >> 2, 0xDEAD_BABE);
        ram.write_idx32((0x100 >> 2) + 3, 0x0102_0304);
        let img = snapshot(&ram, 0x100, 2, 2, TexelSize::Bits32);
        assert_eq!(img.get_pixel(0, 0).0, [0xDE, 0xAD, 0xBA, 0xBE]);
        assert_eq!(img.get_pixel(1, 1).0, [1, 2, 3, 4]);
    }

    #[test]
    fn rgba16_pixels_expand() {
        let mut ram = Rdram::new(0x1000);
        ram.write_idx16(0x80, 0xF801);
        ram.write_idx16(0x81, 0x003E);
        let img = snapshot(&ram, 0x100, 2, 1, TexelSize::Bits16);
        assert_eq!(img.get_pixel(0, 0).0, [0xFF, 0, 0, 0xFF]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0xFF, 0]);
    }
}
