//! Integration tests for the full generation pipeline.
//!
//! These tests drive generators end to end with fixed entropy and check the
//! exact IDs produced: source bytes -> cursor -> rejection sampling ->
//! encoder -> string.

use puid_core::error::{AlphabetError, EncodingError, EntropyError, Error};
use puid_core::{Alphabet, Charset, FixedSource, Generator, PrngSource, RepeatRisk};
use rand::RngCore;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn fixed(hex: &str) -> FixedSource {
    FixedSource::from_hex(hex).expect("bad hex")
}

fn charset_gen(bits: f64, charset: Charset, hex: &str) -> Generator {
    Generator::builder()
        .bits(bits)
        .charset(charset)
        .source(fixed(hex))
        .build()
        .expect("build failed")
}

fn custom_gen(bits: f64, chars: &str, hex: &str) -> Generator {
    Generator::builder()
        .bits(bits)
        .chars(chars)
        .source(fixed(hex))
        .build()
        .expect("build failed")
}

fn assert_ids(gen: &mut Generator, expected: &[&str]) {
    for want in expected {
        assert_eq!(gen.generate().expect("generate failed"), *want);
    }
}

#[test]
fn test_hex() {
    let hex = "C7 C9 00 2A";
    assert_ids(&mut charset_gen(8.0, Charset::Hex, hex), &["c7", "c9", "00", "2a"]);
    assert_ids(&mut charset_gen(12.0, Charset::Hex, hex), &["c7c", "900"]);
    assert_ids(&mut charset_gen(32.0, Charset::Hex, hex), &["c7c9002a"]);
}

#[test]
fn test_hex_upper() {
    let mut gen = charset_gen(12.0, Charset::HexUpper, "c7 c9 00 2a 16 32");
    assert_ids(&mut gen, &["C7C", "900", "2A1", "632"]);
}

#[test]
fn test_alpha_family() {
    let mut gen = charset_gen(14.0, Charset::Alpha, "F1 B1 78 0A CE 2B");
    assert_ids(&mut gen, &["jYv", "AVn"]);

    let mut gen = charset_gen(14.0, Charset::AlphaUpper, "F1 B1 78 0A CE 28");
    assert_ids(&mut gen, &["RWF", "AFM"]);
}

#[test]
fn test_alpha_lower_with_reset() {
    let hex = "F1 B1 78 0B AA 28";
    assert_ids(&mut charset_gen(8.0, Charset::AlphaLower, hex), &["rw", "fa", "fk"]);
    assert_ids(&mut charset_gen(14.0, Charset::AlphaLower, hex), &["rwf", "afk"]);
    assert_ids(&mut charset_gen(22.0, Charset::AlphaLower, hex), &["rwfaf"]);

    // same generator, rewound
    let mut gen = charset_gen(8.0, Charset::AlphaLower, hex);
    assert_ids(&mut gen, &["rw", "fa"]);
    gen.reset();
    assert_ids(&mut gen, &["rw", "fa", "fk"]);
}

#[test]
fn test_alpha_num_family() {
    let hex = "D2 E3 E9 FA 19 00";
    assert_ids(&mut charset_gen(12.0, Charset::AlphaNum, hex), &["0uP", "pQy"]);
    assert_ids(&mut charset_gen(41.0, Charset::AlphaNum, hex), &["0uPpQyA"]);

    let hex = "D2 E3 E9 FA 19 00 C8 2D";
    assert_ids(&mut charset_gen(12.0, Charset::AlphaNumLower, hex), &["s9p", "qib"]);
    assert_ids(&mut charset_gen(26.0, Charset::AlphaNumUpper, hex), &["S9PQIB"]);
}

#[test]
fn test_base32_family() {
    let mut gen = charset_gen(46.0, Charset::Base32, "D2 E3 E9 DA 19 00 22");
    assert_ids(&mut gen, &["2LR6TWQZAA"]);

    let hex = "d2 e3 e9 da 19 03 b7 3c";
    assert_ids(&mut charset_gen(30.0, Charset::Base32Hex, hex), &["qbhujm", "gp0erj"]);
    assert_ids(
        &mut charset_gen(14.0, Charset::Base32HexUpper, hex),
        &["QBH", "UJM", "GP0", "ERJ"],
    );

    let mut gen = charset_gen(20.0, Charset::Crockford32, "d2 e3 e9 da 19 03 b7 3c 00");
    assert_ids(&mut gen, &["TBHY", "KPGS", "0EVK"]);
}

#[test]
fn test_decimal() {
    let mut gen = charset_gen(16.0, Charset::Decimal, "d2 e3 e9 da 19 03 b7 3c ff");
    assert_ids(&mut gen, &["41402", "07699"]);
}

#[test]
fn test_safe32() {
    let hex = "d2 e3 e9 da 19 03 b7 3c";
    assert_ids(
        &mut charset_gen(7.0, Charset::Safe32, hex),
        &["Mh", "rR", "BG", "qL", "2n", "NB"],
    );
    assert_ids(&mut charset_gen(21.0, Charset::Safe32, hex), &["MhrRB", "GqL2n"]);
    assert_ids(&mut charset_gen(58.0, Charset::Safe32, hex), &["MhrRBGqL2nNB"]);
}

#[test]
fn test_safe_ascii() {
    let mut gen = charset_gen(18.0, Charset::SafeAscii, "A6 33 2A BE E6 2D B3 68 41");
    assert_ids(&mut gen, &["x/8", "R;~"]);
}

#[test]
fn test_safe64_default_alphabet() {
    let hex = "D2 E3 E9 FA 19 00";
    let mut gen = Generator::builder()
        .bits(25.0)
        .source(fixed(hex))
        .build()
        .expect("build failed");
    assert_ids(&mut gen, &["0uPp-"]);

    let mut gen = Generator::builder()
        .bits(48.0)
        .source(fixed(hex))
        .build()
        .expect("build failed");
    assert_ids(&mut gen, &["0uPp-hkA"]);
}

#[test]
fn test_custom_ascii() {
    let hex = "C7 C9 00 2A BD 72";
    assert_ids(&mut custom_gen(24.0, "dingosky", hex), &["kiyooodd", "insgkskn"]);

    let hex = "A6 33 F6 9E BD EE A7 00 00";
    assert_ids(
        &mut custom_gen(3.0, "aeiouAEIOU", hex),
        &["o", "e", "U", "o", "A", "A", "o"],
    );
    assert_ids(&mut custom_gen(14.0, "aeiouAEIOU", hex), &["oeUoA"]);
    assert_ids(&mut custom_gen(20.0, "aeiouAEIOU", hex), &["oeUoAAo"]);
}

#[test]
fn test_custom_unicode() {
    let hex = "C7 C9 00 2A BD 72";
    assert_ids(&mut custom_gen(24.0, "dîngøsky", hex), &["kîyøøødd", "însgkskn"]);

    let hex = "ec f9 db 7a 33 3d 21 97 a0 c2 bf 92 80 dd 2f 57 12 c1 1a ef";
    assert_ids(
        &mut custom_gen(24.0, "dîngøsky:🐕", hex),
        &["🐕gî🐕🐕nî🐕", "ydkîsnsd", "îøsîndøk"],
    );
}

#[test]
fn test_256_symbols() {
    let chars: String = (65u32..=90)
        .chain(97..=122)
        .chain(48..=57)
        .chain([45, 95])
        .chain(256..=383)
        .chain(19904..=19967)
        .filter_map(char::from_u32)
        .collect();
    assert_eq!(chars.chars().count(), 256);

    let hex = "ec f9 db 7a 33 3d 21 97 a0 c2 bf 92 80 dd 2f 57 12 c1 1a ef";
    let mut gen = custom_gen(36.0, &chars, hex);
    assert_eq!(gen.length(), 5);
    assert_eq!(gen.bits_per_symbol(), 8.0);
    assert_eq!(gen.ere(), 0.5);
    assert_ids(&mut gen, &["䷬䷹䷛ĺz", "9hŗŠ䷂", "ſŒŀ䷝v", "ėS䷁a䷯"]);
}

/// Replays fixed 64-bit words, cycling.
struct Words {
    words: Vec<u64>,
    next: usize,
}

impl Words {
    fn new() -> Self {
        // 55 69 31 f7 fc 73 0a 72 | d2 c3 3a ea 8a 03 f6 7c |
        // f2 0b 59 90 78 e8 02 13 | b7 03 40 96 71 ef fc cc
        Self {
            words: vec![
                8217508000407054677,
                9004388400143975378,
                1369912841189526514,
                14770944148999504823,
            ],
            next: 0,
        }
    }
}

impl RngCore for Words {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn test_prng_word_source_hex() {
    let mut gen = Generator::builder()
        .bits(24.0)
        .charset(Charset::Hex)
        .source(PrngSource::with_rng(Words::new(), "Fixed u64 words"))
        .build()
        .expect("build failed");

    assert_ids(
        &mut gen,
        &[
            "556931", "f7fc73", "0a72d2", "c33aea", "8a03f6", "7cf20b", "599078", "e80213",
            "b70340", "9671ef", "fccc55",
        ],
    );
    assert_eq!(gen.source_description(), "Fixed u64 words");
}

#[test]
fn test_prng_word_source_safe64() {
    let mut gen = Generator::builder()
        .bits(44.0)
        .source(PrngSource::with_rng(Words::new(), "Fixed u64 words"))
        .build()
        .expect("build failed");

    assert_ids(&mut gen, &["VWkx9_xz", "CnLSwzrq", "igP2fPIL", "WZB46AIT"]);
}

#[test]
fn test_settings_figures() {
    let cases: [(Generator, f64, f64, f64, usize); 7] = [
        (Generator::new().unwrap(), 132.0, 6.0, 0.75, 22),
        (Generator::builder().bits(66.6).build().unwrap(), 72.0, 6.0, 0.75, 12),
        (
            Generator::builder().bits(80.0).charset(Charset::Alpha).build().unwrap(),
            85.51,
            5.7,
            0.71,
            15,
        ),
        (
            Generator::builder().bits(100.0).chars("thequickfox").build().unwrap(),
            100.32,
            3.46,
            0.43,
            29,
        ),
        (
            Generator::builder()
                .bits(64.0)
                .chars("\u{1F98A}:théquiçkfox")
                .build()
                .unwrap(),
            66.61,
            3.7,
            0.33,
            18,
        ),
        (
            Generator::builder()
                .bits(96.0)
                .charset(Charset::AlphaNumUpper)
                .build()
                .unwrap(),
            98.23,
            5.17,
            0.65,
            19,
        ),
        (
            Generator::builder()
                .total_risk(1e7, RepeatRisk::one_in(1e12))
                .charset(Charset::Hex)
                .build()
                .unwrap(),
            88.0,
            4.0,
            0.5,
            22,
        ),
    ];

    for (mut gen, bits, bps, ere, length) in cases {
        assert_eq!(round2(gen.bits()), bits, "{gen}");
        assert_eq!(round2(gen.bits_per_symbol()), bps, "{gen}");
        assert_eq!(round2(gen.ere()), ere, "{gen}");
        assert_eq!(gen.length(), length, "{gen}");
        assert_eq!(gen.generate().unwrap().chars().count(), length);
    }
}

#[test]
fn test_total_risk_figures() {
    let risk = RepeatRisk::one_in(1e12);
    let gen = Generator::builder().total_risk(1e7, risk).build().unwrap();
    assert_eq!(gen.bits(), 90.0);
    assert_eq!(gen.length(), 15);

    let gen = Generator::builder()
        .total_risk(1e7, risk)
        .charset(Charset::AlphaLower)
        .build()
        .unwrap();
    assert_eq!(round2(gen.bits()), 89.31);
    assert_eq!(gen.length(), 19);

    let risk = RepeatRisk::one_in(1e15);
    let gen = Generator::builder()
        .total_risk(1e9, risk)
        .chars("dingoskyme")
        .build()
        .unwrap();
    assert_eq!(round2(gen.bits()), 109.62);
    assert_eq!(round2(gen.bits_per_symbol()), 3.32);
    assert_eq!(round2(gen.ere()), 0.42);
    assert_eq!(gen.length(), 33);

    let gen = Generator::builder()
        .total_risk(1e9, risk)
        .chars("dîngøsky:\u{1F415}")
        .build()
        .unwrap();
    assert_eq!(round2(gen.bits()), 109.62);
    assert_eq!(round2(gen.ere()), 0.28);
}

#[test]
fn test_risk_after_beats_requested_risk() {
    let gen = Generator::builder()
        .total_risk(1e6, RepeatRisk::one_in(1e6))
        .build()
        .unwrap();
    assert!(gen.risk_after(1e6) > 1e6);
}

#[test]
fn test_every_charset_generates() {
    for charset in Charset::ALL {
        let mut gen = Generator::builder()
            .charset(charset)
            .source(PrngSource::seeded(99))
            .build()
            .expect("build failed");
        let id = gen.generate().expect("generate failed");
        assert_eq!(id.chars().count(), gen.length(), "{charset}");
        assert!(id.chars().all(|c| charset.symbols().contains(c)), "{charset}");
    }
}

#[test]
fn test_empty_fixed_source() {
    let mut gen = Generator::builder()
        .source(fixed(""))
        .build()
        .expect("build failed");
    let err = gen.generate().unwrap_err();
    assert!(matches!(err, Error::Entropy(EntropyError::Exhausted { .. })));
    assert!(err.to_string().contains("bytes are exhausted"));
    assert_eq!(gen.source_description(), "Fixed Bytes");
}

#[test]
fn test_alphabet_errors() {
    let cases = [
        ("1", "TooFewSymbols"),
        ("dingodog", "DuplicateSymbols"),
        ("dingo`sky", "InvalidSymbol"),
    ];
    for (chars, kind) in cases {
        let err = Generator::builder().chars(chars).build().unwrap_err();
        let Error::Alphabet(err) = err else {
            panic!("expected alphabet error for {chars:?}");
        };
        assert!(format!("{err:?}").starts_with(kind), "{chars:?}: {err:?}");
    }

    let too_many: String = (0x100u32..0x100 + 257).filter_map(char::from_u32).collect();
    assert!(matches!(
        Alphabet::new(&too_many),
        Err(AlphabetError::TooManySymbols { count: 257, max: 256 })
    ));
}

#[test]
fn test_encode_from_bits() {
    let gen = Generator::builder()
        .bits(55.0)
        .charset(Charset::AlphaLower)
        .build()
        .unwrap();
    let bits = [0x8D, 0x8A, 0x02, 0xA8, 0x07, 0x0B, 0x0D, 0x00];
    assert_eq!(gen.encode(&bits).unwrap(), "rwfafkahbmgq");

    let gen = Generator::builder()
        .bits(34.0)
        .charset(Charset::Alpha)
        .build()
        .unwrap();
    let bits = [0xFC, 0, 0, 0, 0];
    assert!(matches!(
        gen.encode(&bits),
        Err(Error::Encoding(EncodingError::InvalidEncoding {
            index: 63,
            symbol_count: 52
        }))
    ));
}

#[test]
fn test_decode_round_trip() {
    for charset in [Charset::Hex, Charset::SafeAscii, Charset::Base58] {
        let mut gen = Generator::builder()
            .bits(128.0)
            .charset(charset)
            .build()
            .unwrap();
        let id = gen.generate().unwrap();
        let bits = gen.decode(&id).unwrap();
        assert_eq!(gen.encode(&bits).unwrap(), id);
    }
}

#[test]
fn test_decode_errors() {
    let gen = Generator::builder()
        .bits(50.0)
        .chars("dîngøsky")
        .build()
        .unwrap();
    assert!(matches!(
        gen.decode("kîy"),
        Err(Error::Encoding(EncodingError::DecodeUnsupported))
    ));

    let mut gen = Generator::builder()
        .bits(64.0)
        .charset(Charset::Alpha)
        .build()
        .unwrap();
    let id = gen.generate().unwrap();
    assert!(matches!(
        gen.decode(&id[1..]),
        Err(Error::Encoding(EncodingError::LengthMismatch { .. }))
    ));
}
