#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    // Data transfer
    Mov,   // Move
    Push,  // Push
    Pop,   // Pop
    Xchg,  // Exchange
    In,    // Input from
    Out,   // Output to
    Xlat,  // Translate byte to AL
    Lea,   // Load effective address to register
    Lds,   // Load pointer to DS
    Les,   // Load pointer to ES
    Lahf,  // Load AH with flags
    Sahf,  // Store AH into flags
    Pushf, // Push flags
    Popf,  // Pop flags

    // Arithmetic
    Add,  // Add
    Adc,  // Add with carry
    Inc,  // Increment
    Aaa,  // ASCII adjust for add
    Daa,  // Decimal adjust for add
    Sub,  // Subtract
    Sbb,  // Subtract with borrow
    Dec,  // Decrement
    Neg,  // Change sign
    Cmp,  // Compare
    Aas,  // ASCII adjust for subtract
    Das,  // Decimal adjust for subtract
    Mul,  // Multiply (unsigned)
    Imul, // Integer multiply (signed)
    Aam,  // ASCII adjust for multiply
    Div,  // Divide (unsigned)
    Idiv, // Integer divide (signed)
    Aad,  // ASCII adjust for divide
    Cbw,  // Convert byte to word
    Cwd,  // Convert word to double word

    // Logic
    Not,  // Invert
    Shl,  // Shift logical left (alias: SAL)
    Shr,  // Shift logical right
    Sar,  // Shift arithmetic right
    Rol,  // Rotate left
    Ror,  // Rotate right
    Rcl,  // Rotate through carry flag left
    Rcr,  // Rotate through carry flag right
    And,  // And
    Test, // And function to flags, no result
    Or,   // Or
    Xor,  // Exclusive or

    // String manipulation, width comes from the instruction.
    Movs, // Move byte/word
    Cmps, // Compare byte/word
    Scas, // Scan byte/word
    Lods, // Load byte/word to AL/AX
    Stos, // Store byte/word from AL/AX

    // Control transfer
    Call,    // Call
    CallFar, // Call through a far pointer in memory
    Jmp,     // Unconditional jump
    JmpFar,  // Jump through a far pointer in memory
    Ret,     // Return from CALL
    Retf,    // Return from far CALL
    Je,      // Jump on equal/zero (alias JZ)
    Jl,      // Jump on less/not greater or equal (alias JNGE)
    Jle,     // Jump on less or equal/not greater (alias JNG)
    Jb,      // Jump on below/not above or equal (alias JNAE)
    Jbe,     // Jump on below or equal/not above (alias JNA)
    Jp,      // Jump on parity/parity even (alias JPE)
    Jo,      // Jump on overflow
    Js,      // Jump on sign
    Jne,     // Jump on not equal/not zero (alias JNZ)
    Jnl,     // Jump on not less/greater or equal (alias JGE)
    Jnle,    // Jump on not less or equal/greater (alias JG)
    Jnb,     // Jump on not below/above or equal (alias JAE)
    Jnbe,    // Jump on not below or equal/above (alias JA)
    Jnp,     // Jump on not parity/parity odd (alias JPO)
    Jno,     // Jump on not overflow
    Jns,     // Jump on not sign
    Loop,    // Loop CX times
    Loopz,   // Loop while zero/equal (alias LOOPE)
    Loopnz,  // Loop while not zero/equal (alias LOOPNE)
    Jcxz,    // Jump on CX zero
    Int,     // Interrupt
    Int3,    // Interrupt 3
    Into,    // Interrupt on overflow
    Iret,    // Interrupt return

    // Processor control
    Clc,  // Clear carry
    Cmc,  // Complement carry
    Stc,  // Set carry
    Cld,  // Clear direction
    Std,  // Set direction
    Cli,  // Clear interrupt
    Sti,  // Set interrupt
    Hlt,  // Halt
    Wait, // Wait
    Esc,  // Escape (to external device)
    Nop,  // No operation

    // Undocumented
    Salc, // Set AL on carry
}

impl Mnemonic {
    /// String instructions carry their width as a `b`/`w` suffix instead of operands.
    pub fn is_string(self) -> bool {
        use Mnemonic::*;

        matches!(self, Movs | Cmps | Scas | Lods | Stos)
    }

    /// Instructions whose memory operand is used as an address, not as a value of a given width.
    pub fn takes_address(self) -> bool {
        use Mnemonic::*;

        matches!(self, Lea | Lds | Les | CallFar | JmpFar | Esc)
    }

    pub fn as_str(self) -> &'static str {
        use Mnemonic::*;

        match self {
            Mov => "mov",
            Push => "push",
            Pop => "pop",
            Xchg => "xchg",
            In => "in",
            Out => "out",
            Xlat => "xlat",
            Lea => "lea",
            Lds => "lds",
            Les => "les",
            Lahf => "lahf",
            Sahf => "sahf",
            Pushf => "pushf",
            Popf => "popf",

            Add => "add",
            Adc => "adc",
            Inc => "inc",
            Aaa => "aaa",
            Daa => "daa",
            Sub => "sub",
            Sbb => "sbb",
            Dec => "dec",
            Neg => "neg",
            Cmp => "cmp",
            Aas => "aas",
            Das => "das",
            Mul => "mul",
            Imul => "imul",
            Aam => "aam",
            Div => "div",
            Idiv => "idiv",
            Aad => "aad",
            Cbw => "cbw",
            Cwd => "cwd",

            Not => "not",
            Shl => "shl",
            Shr => "shr",
            Sar => "sar",
            Rol => "rol",
            Ror => "ror",
            Rcl => "rcl",
            Rcr => "rcr",
            And => "and",
            Test => "test",
            Or => "or",
            Xor => "xor",

            Movs => "movs",
            Cmps => "cmps",
            Scas => "scas",
            Lods => "lods",
            Stos => "stos",

            Call => "call",
            CallFar => "call far",
            Jmp => "jmp",
            JmpFar => "jmp far",
            Ret => "ret",
            Retf => "retf",
            Je => "je",
            Jl => "jl",
            Jle => "jle",
            Jb => "jb",
            Jbe => "jbe",
            Jp => "jp",
            Jo => "jo",
            Js => "js",
            Jne => "jne",
            Jnl => "jnl",
            Jnle => "jnle",
            Jnb => "jnb",
            Jnbe => "jnbe",
            Jnp => "jnp",
            Jno => "jno",
            Jns => "jns",
            Loop => "loop",
            Loopz => "loopz",
            Loopnz => "loopnz",
            Jcxz => "jcxz",
            Int => "int",
            Int3 => "int3",
            Into => "into",
            Iret => "iret",

            Clc => "clc",
            Cmc => "cmc",
            Stc => "stc",
            Cld => "cld",
            Std => "std",
            Cli => "cli",
            Sti => "sti",
            Hlt => "hlt",
            Wait => "wait",
            Esc => "esc",
            Nop => "nop",

            Salc => "salc",
        }
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
