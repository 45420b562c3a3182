// ARPABET phoneme helpers.
//
// A transcription is the ordered list of phoneme symbols the pronouncing
// dictionary gives for a word, e.g. `["K", "AE1", "T"]` for "cat". Vowel
// phonemes carry a trailing stress digit:
// - `0`: no stress
// - `1`: primary stress
// - `2`: secondary stress
// Consonants carry no digit. Everything stress- and rhyme-related in the
// core crate is derived from these digits.

/// One pronunciation of a word: ARPABET symbols in spoken order.
pub type Transcription = Vec<String>;

/// The stress digit of a vowel phoneme (`"AE1"` -> `Some(1)`), or `None`
/// for a consonant.
pub fn stress_digit(phoneme: &str) -> Option<u8> {
    match phoneme.as_bytes().last() {
        Some(&b @ b'0'..=b'2') => Some(b - b'0'),
        _ => None,
    }
}

/// Whether the phoneme is a vowel sound (carries a stress digit).
pub fn is_vowel(phoneme: &str) -> bool {
    stress_digit(phoneme).is_some()
}

/// Number of vowel phonemes in a transcription.
pub fn vowel_count<S: AsRef<str>>(transcription: &[S]) -> usize {
    transcription.iter().filter(|p| is_vowel(p.as_ref())).count()
}
