use super::*;
use crate::modrm::Mode;
use d86_instruction::{AddressingMode, Mnemonic};

/// Decodes `bytes` as exactly one instruction and checks that every byte was consumed.
macro_rules! test_decode {
    ($bytes:expr, $expected:expr) => {{
        let bytes: &[u8] = &$bytes;
        let mut cursor = ByteCursor::new(bytes);
        let instruction = decode_instruction(&mut cursor).unwrap();
        assert_eq!(instruction.to_string(), $expected, "{:02X?}", bytes);
        assert_eq!(instruction.bytes, bytes, "{:02X?}", bytes);
        assert_eq!(instruction.len(), cursor.position());
        instruction
    }};
}

/// Decodes `bytes`, expects `$error` and checks that the cursor did not move.
macro_rules! test_decode_error {
    ($bytes:expr, $error:expr) => {{
        let bytes: &[u8] = &$bytes;
        let mut cursor = ByteCursor::new(bytes);
        assert_eq!(decode_instruction(&mut cursor), Err($error), "{:02X?}", bytes);
        assert_eq!(cursor.position(), 0);
    }};
}

fn modrm(mode: Mode, reg: u8, rm: u8) -> u8 {
    ModRm::new(mode, reg, rm).as_byte()
}

#[test]
fn inc_register() {
    let instruction = test_decode!([0x40], "inc ax");
    assert_eq!(instruction.len(), 1);
    assert_eq!(instruction.mnemonic, Mnemonic::Inc);

    test_decode!([0x4F], "dec di");
    test_decode!([0x53], "push bx");
    test_decode!([0x5D], "pop bp");
}

#[test]
fn register_or_memory_with_register() {
    let instruction = test_decode!([0x00, 0x00], "add byte [bx+si], al");
    assert_eq!(
        instruction.operands,
        OperandSet::DestinationAndSource(
            Operand::Indirect(AddressingMode::BxSi, Displacement::None),
            Operand::Register(SizedRegister(Register::AlAx, OperandSize::Byte)),
        )
    );

    test_decode!(
        [0x03, modrm(Mode::MemoryByteDisplacement, 0b000, 0b111), 0x10],
        "add ax, word [bx+0x10]"
    );
    test_decode!([0x8B, 0x46, 0xFE], "mov ax, word [bp-0x2]");
    test_decode!(
        [0x31, modrm(Mode::Register, 0b011, 0b001)],
        "xor cx, bx"
    );
    test_decode!([0x2A, 0x87, 0x34, 0x12], "sub al, byte [bx+0x1234]");
    test_decode!([0x85, 0xC3], "test bx, ax");
    test_decode!([0x87, 0x1E, 0x00, 0x02], "xchg word [0x0200], bx");
}

#[test]
fn immediate_group() {
    let instruction = test_decode!([0x80, 0x06, 0x12, 0x34, 0x56], "add byte [0x3412], 0x56");
    assert_eq!(instruction.operand_size, OperandSize::Byte);

    test_decode!([0x81, 0xC3, 0x34, 0x12], "add bx, 0x1234");
    test_decode!([0x83, 0xC0, 0xFF], "add ax, 0xffff");
    test_decode!([0x83, 0x7E, 0x04, 0x01], "cmp word [bp+0x4], 0x1");
    test_decode!([0x80, 0xE4, 0x0F], "and ah, 0xf");

    // s=1 with w=0 still reads a single byte.
    let instruction = test_decode!([0x82, 0xC0, 0xFF], "add al, 0xff");
    assert_eq!(instruction.operand_size, OperandSize::Byte);
    test_decode!([0x82, 0x3F, 0x80], "cmp byte [bx], 0x80");
}

#[test]
fn accumulator_immediate() {
    test_decode!([0x04, 0x01], "add al, 0x1");
    test_decode!([0x3D, 0x00, 0x80], "cmp ax, 0x8000");
    test_decode!([0xA8, 0x01], "test al, 0x1");
}

#[test]
fn mov_forms() {
    test_decode!([0xB4, 0x4C], "mov ah, 0x4c");
    test_decode!([0xB8, 0x34, 0x12], "mov ax, 0x1234");
    test_decode!([0x8C, 0xD8], "mov ax, ds");
    test_decode!([0x8E, 0xD8], "mov ds, ax");
    test_decode!([0x8E, 0x06, 0x00, 0x01], "mov es, word [0x0100]");
    test_decode!([0xA1, 0x34, 0x12], "mov ax, word [0x1234]");
    test_decode!([0xA2, 0x34, 0x12], "mov byte [0x1234], al");
    test_decode!([0xC6, 0x07, 0x01], "mov byte [bx], 0x1");
    test_decode!([0xC7, 0x06, 0x12, 0x34, 0x01, 0x00], "mov word [0x3412], 0x1");
}

#[test]
fn address_only_operands() {
    test_decode!([0x8D, 0x36, 0x00, 0x01], "lea si, [0x0100]");
    test_decode!([0xC4, 0x5E, 0x06], "les bx, [bp+0x6]");
    test_decode!([0xC5, 0x36, 0x80, 0x00], "lds si, [0x0080]");
    test_decode!([0xD9, 0x07], "esc 0x8, [bx]");
}

#[test]
fn shift_group() {
    test_decode!([0xD1, 0xE0], "shl ax, 0x1");
    test_decode!([0xD2, 0x27], "shl byte [bx], cl");
    test_decode!([0xD3, 0xF8], "sar ax, cl");
    test_decode!([0xD0, 0xC8], "ror al, 0x1");
}

#[test]
fn unary_group() {
    test_decode!([0xF6, 0xC4, 0x80], "test ah, 0x80");
    test_decode!([0xF7, 0xE3], "mul bx");
    test_decode!([0xF7, 0xD8], "neg ax");
    test_decode!([0xF6, 0x37], "div byte [bx]");
}

#[test]
fn indirect_group() {
    test_decode!([0xFE, 0xC0], "inc al");
    test_decode!([0xFF, 0x47, 0xFF], "inc word [bx-0x1]");
    test_decode!([0xFF, 0xD3], "call bx");
    test_decode!([0xFF, 0x18], "call far [bx+si]");
    test_decode!([0xFF, 0x26, 0x00, 0x01], "jmp word [0x0100]");
    test_decode!([0xFF, 0x76, 0x04], "push word [bp+0x4]");
    test_decode!([0x8F, 0x06, 0x34, 0x12], "pop word [0x1234]");
}

#[test]
fn segment_registers() {
    test_decode!([0x1E], "push ds");
    test_decode!([0x07], "pop es");
    test_decode!([0x0F], "pop cs");
}

#[test]
fn control_transfer() {
    test_decode!([0xEB, 0xFE], "jmp $+0x0");
    test_decode!([0x75, 0x10], "jne $+0x12");
    test_decode!([0x7C, 0xF0], "jl $-0xe");
    test_decode!([0xE2, 0xFC], "loop $-0x2");
    test_decode!([0xE3, 0x00], "jcxz $+0x2");
    test_decode!([0xE8, 0x00, 0x01], "call $+0x103");
    test_decode!([0xE9, 0xFD, 0xFF], "jmp $+0x0");
    test_decode!([0xEA, 0x5B, 0xE0, 0x00, 0xF0], "jmp 0xf000:0xe05b");
    test_decode!([0x9A, 0x00, 0x00, 0x00, 0xF0], "call 0xf000:0x0");
    test_decode!([0xC3], "ret");
    test_decode!([0xC2, 0x04, 0x00], "ret 0x4");
    test_decode!([0xCB], "retf");
    test_decode!([0xCA, 0x02, 0x00], "retf 0x2");
    test_decode!([0xCD, 0x21], "int 0x21");
    test_decode!([0xCC], "int3");
    test_decode!([0xCF], "iret");
}

#[test]
fn ports() {
    test_decode!([0xE4, 0x60], "in al, 0x60");
    test_decode!([0xE7, 0x40], "out 0x40, ax");
    test_decode!([0xEC], "in al, dx");
    test_decode!([0xEF], "out dx, ax");
}

#[test]
fn implied_operands() {
    test_decode!([0x90], "nop");
    test_decode!([0x91], "xchg ax, cx");
    test_decode!([0x98], "cbw");
    test_decode!([0x99], "cwd");
    test_decode!([0x27], "daa");
    test_decode!([0x9C], "pushf");
    test_decode!([0xD7], "xlat");
    test_decode!([0xD6], "salc");
    test_decode!([0xD4, 0x0A], "aam 0xa");
    test_decode!([0xD5, 0x0A], "aad 0xa");
    test_decode!([0xF4], "hlt");
    test_decode!([0xFA], "cli");
    test_decode!([0xFC], "cld");
}

#[test]
fn string_instructions() {
    test_decode!([0xA4], "movsb");
    test_decode!([0xA5], "movsw");
    test_decode!([0xAE], "scasb");
    test_decode!([0xAB], "stosw");
}

#[test]
fn prefixes_are_part_of_the_instruction() {
    let instruction = test_decode!([0xF3, 0xA4], "rep movsb");
    assert_eq!(instruction.repeat, Some(Repeat::Equal));

    test_decode!([0xF2, 0xAE], "repne scasb");

    let instruction = test_decode!([0x26, 0x8B, 0x07], "mov ax, word [es:bx]");
    assert_eq!(instruction.segment_override, Some(Segment::ES));
    assert_eq!(instruction.len(), 3);

    test_decode!([0x2E, 0xAC], "cs: lodsb");
    test_decode!([0xF0, 0x86, 0x07], "lock xchg byte [bx], al");
    test_decode!([0xF3, 0x26, 0xA5], "rep es: movsw");
    test_decode!(
        [0x36, 0x80, 0x46, 0x02, 0x05],
        "add byte [ss:bp+0x2], 0x5"
    );
}

#[test]
fn end_of_stream() {
    test_decode_error!([], DecodeError::EndOfStream);
}

#[test]
fn unknown_op_codes() {
    test_decode_error!(
        [0x60],
        DecodeError::UnknownOpcode {
            opcode: 0x60,
            offset: 0
        }
    );

    // Reported at the start of the instruction, prefixes included.
    test_decode_error!(
        [0xF3, 0xC8, 0x00],
        DecodeError::UnknownOpcode {
            opcode: 0xC8,
            offset: 0
        }
    );
}

#[test]
fn unknown_extensions() {
    test_decode_error!(
        [0xFF, 0x38],
        DecodeError::UnknownExtension {
            opcode: 0xFF,
            sub_op: 7,
            offset: 0
        }
    );
    test_decode_error!(
        [0xF6, 0x08, 0x00],
        DecodeError::UnknownExtension {
            opcode: 0xF6,
            sub_op: 1,
            offset: 0
        }
    );
    test_decode_error!(
        [0xD0, 0x30],
        DecodeError::UnknownExtension {
            opcode: 0xD0,
            sub_op: 6,
            offset: 0
        }
    );
    test_decode_error!(
        [0x8C, 0xE0],
        DecodeError::UnknownExtension {
            opcode: 0x8C,
            sub_op: 4,
            offset: 0
        }
    );
}

#[test]
fn truncated_input() {
    // Direct address without its two bytes.
    test_decode_error!(
        [0x00, 0x06],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 2
        }
    );
    test_decode_error!(
        [0x00, 0x06, 0x12],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 2
        }
    );
    // Missing ModR/M byte.
    test_decode_error!(
        [0x00],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 1
        }
    );
    // Missing immediate after a complete ModR/M operand.
    test_decode_error!(
        [0x80, 0x00],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 1
        }
    );
    test_decode_error!(
        [0x82, 0xC0],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 1
        }
    );
    test_decode_error!(
        [0xB8, 0x34],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 2
        }
    );
    // A prefix with nothing after it is not the end of the stream.
    test_decode_error!(
        [0x26],
        DecodeError::TruncatedInput {
            offset: 0,
            needed: 1
        }
    );

    // One byte of the address is present, the message names the read rather than a count.
    let err = decode_instruction(&mut ByteCursor::new(&[0x00, 0x06, 0x12])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "instruction at offset 0x0 is truncated, a 2-byte read failed"
    );
}

#[test]
fn errors_are_reported_at_the_instruction_start() {
    let data = [0x90, 0x90, 0x00, 0x06, 0x12];
    let mut cursor = ByteCursor::at(&data, 2);

    assert_eq!(
        decode_instruction(&mut cursor),
        Err(DecodeError::TruncatedInput {
            offset: 2,
            needed: 2
        })
    );
    assert_eq!(cursor.position(), 2);
}

#[test]
fn decode_a_sequence() {
    // mov ah, 0x9 / mov dx, 0x109 / int 0x21 / ret
    let data = [0xB4, 0x09, 0xBA, 0x09, 0x01, 0xCD, 0x21, 0xC3];
    let mut cursor = ByteCursor::new(&data);
    let mut lines = vec![];
    let mut total = 0;

    loop {
        match decode_instruction(&mut cursor) {
            Ok(instruction) => {
                assert_eq!(instruction.offset, total);
                total += instruction.len();
                assert_eq!(cursor.position(), total);
                lines.push(instruction.to_string());
            }
            Err(DecodeError::EndOfStream) => break,
            Err(err) => panic!("{}", err),
        }
    }

    assert_eq!(total, data.len());
    assert_eq!(lines, ["mov ah, 0x9", "mov dx, 0x109", "int 0x21", "ret"]);
}

#[test]
fn decoder_offsets_include_the_origin() {
    let data = [0x90, 0x60, 0x40];
    let mut decoder = Decoder::with_origin(&data, 0x100);

    let nop = decoder.decode_one().unwrap();
    assert_eq!(nop.offset, 0x100);
    assert_eq!(nop.next_offset(), 0x101);

    assert_eq!(
        decoder.decode_one(),
        Err(DecodeError::UnknownOpcode {
            opcode: 0x60,
            offset: 0x101
        })
    );
    assert_eq!(decoder.offset(), 0x101);
    assert_eq!(decoder.remaining(), 2);

    assert_eq!(decoder.skip_byte(), Some(0x60));

    let inc = decoder.decode_one().unwrap();
    assert_eq!(inc.offset, 0x102);
    assert_eq!(inc.to_string(), "inc ax");

    assert!(decoder.is_at_end());
    assert_eq!(decoder.decode_one(), Err(DecodeError::EndOfStream));
    assert_eq!(decoder.skip_byte(), None);
}

#[test]
fn decoder_offsets_wrap_at_the_top_of_the_address_range() {
    let data = [0x90, 0x90, 0x60];
    let mut decoder = Decoder::with_origin(&data, usize::MAX);

    assert_eq!(decoder.decode_one().unwrap().offset, usize::MAX);
    assert_eq!(decoder.offset(), 0);
    assert_eq!(decoder.decode_one().unwrap().offset, 0);
    assert_eq!(
        decoder.decode_one(),
        Err(DecodeError::UnknownOpcode {
            opcode: 0x60,
            offset: 1
        })
    );
}

#[test]
fn disjoint_regions_decode_in_parallel() {
    let data = [
        0x40, 0x41, 0x42, 0x43, // inc ax..bx
        0xB8, 0x34, 0x12, 0xC3, // mov ax, 0x1234 / ret
    ];

    let decode_region = |start: usize, end: usize| {
        let mut cursor = ByteCursor::at(&data[..end], start);
        let mut lines = vec![];
        while let Ok(instruction) = decode_instruction(&mut cursor) {
            lines.push(format!("{:04x} {}", instruction.offset, instruction));
        }
        lines
    };

    let (first, second) = std::thread::scope(|s| {
        let first = s.spawn(|| decode_region(0, 4));
        let second = s.spawn(|| decode_region(4, 8));
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_eq!(first, ["0000 inc ax", "0001 inc cx", "0002 inc dx", "0003 inc bx"]);
    assert_eq!(second, ["0004 mov ax, 0x1234", "0007 ret"]);
}
