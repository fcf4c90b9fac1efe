//! Comment stripping for JS/TS sources.
//!
//! A two-state scanner (line comment, block comment) blanks comment bytes
//! with spaces before the import-pattern pass runs. Newlines inside block
//! comments are preserved so line positions stay stable. This is
//! deliberately not a parser; string literals are not tracked.

/// Replace `//` line comments and `/* ... */` block spans with spaces.
/// The output has the same length and the same line structure as the input.
pub fn strip_comments(src: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Line,
        Block,
    }

    let bytes = src.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => {
                if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                    state = State::Line;
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
                    state = State::Block;
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                } else {
                    out.push(b);
                    i += 1;
                }
            }
            State::Line => {
                if b == b'\n' {
                    state = State::Code;
                    out.push(b'\n');
                } else {
                    // Multi-byte UTF-8 continuation bytes collapse to spaces too;
                    // the scanner only needs ASCII structure afterwards.
                    out.push(b' ');
                }
                i += 1;
            }
            State::Block => {
                if b == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                    state = State::Code;
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                } else {
                    if b == b'\n' {
                        out.push(b'\n');
                    } else {
                        out.push(b' ');
                    }
                    i += 1;
                }
            }
        }
    }

    // Input was valid UTF-8 and every replaced byte is ASCII space, so the
    // output is valid UTF-8 as well.
    String::from_utf8(out).expect("comment stripping preserves UTF-8")
}
