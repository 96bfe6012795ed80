use harness_codegen::{HarnessOptions, HarnessTemplate, encode};

const ALPHABET: &[char] = &[
    'a', 'Z', '0', ' ', '\\', '"', '\'', '`', '\n', '\t', '<', '/', '>', '!', '-', '-', '$', '{', '}',
    'é', '漢', '🎮', '\u{2028}', '\u{0}',
];

/// Small xorshift so the generated corpus is identical on every run
fn corpus(count: usize, max_len: usize) -> Vec<String> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..count)
        .map(|_| {
            let len = (next() as usize) % (max_len + 1);
            (0..len)
                .map(|_| ALPHABET[(next() as usize) % ALPHABET.len()])
                .collect()
        })
        .collect()
}

#[test]
fn test_embedded_literal_round_trips() {
    for source in corpus(500, 48) {
        let doc = encode(&source);
        assert_eq!(doc.decoded_source(), source, "literal: {}", doc.embedded_literal());
    }
}

#[test]
fn test_embedded_literal_never_escapes_its_context() {
    for source in corpus(500, 48) {
        let doc = encode(&source);
        let literal = doc.embedded_literal();

        assert!(!literal.contains('\n'));
        assert!(!literal.contains("</"));
        assert!(!literal.contains("<!--"));

        // every quote inside the literal is preceded by an odd run of backslashes
        let bytes = literal.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'"' {
                let run = bytes[..i].iter().rev().take_while(|c| **c == b'\\').count();
                assert!(run % 2 == 1, "unescaped quote at {i} in {literal}");
            }
        }
    }
}

#[test]
fn test_custom_template_encodes_the_same_literal() {
    let template = HarnessTemplate::new(HarnessOptions {
        relay_object: "Bridge".into(),
        ..HarnessOptions::default()
    })
    .expect("valid options");

    for source in corpus(50, 32) {
        assert_eq!(
            template.encode(&source).embedded_literal(),
            encode(&source).embedded_literal()
        );
    }
}
