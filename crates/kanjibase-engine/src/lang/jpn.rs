//! Japanese-specific items.

use {itertools::Itertools, jmdict_furigana::Segment};

/// Checks if the given character is hiragana
///
/// # Examples
///
/// ```
/// # use kanjibase_engine::lang::jpn::is_hiragana;
/// assert!(is_hiragana('あ'));
/// assert!(is_hiragana('ん'));
/// assert!(!is_hiragana('ア'));
/// assert!(!is_hiragana('A'));
/// ```
#[must_use]
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Checks if the given character is katakana
///
/// # Examples
///
/// ```
/// # use kanjibase_engine::lang::jpn::is_katakana;
/// assert!(is_katakana('ア'));
/// assert!(is_katakana('ン'));
/// assert!(!is_katakana('あ'));
/// assert!(!is_katakana('A'));
/// ```
#[must_use]
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Checks if the given character is either hiragana or katakana
///
/// # Examples
///
/// ```
/// # use kanjibase_engine::lang::jpn::is_kana;
/// assert!(is_kana('あ'));
/// assert!(is_kana('ア'));
/// assert!(!is_kana('A'));
/// assert!(!is_kana('漢'));
/// ```
#[must_use]
pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

/// Splits a headword into furigana segments by aligning its kana runs against
/// its reading.
///
/// This is a best-effort guess for headwords which have no record in a
/// furigana table. Each non-kana run gets the part of the reading between the
/// kana runs around it, so a run of several kanji shares one reading.
///
/// # Examples
///
/// ```
/// # use kanjibase_engine::lang::jpn::derive_segments;
/// # use jmdict_furigana::format;
/// let segments = derive_segments("取り扱い", "とりあつかい");
/// assert_eq!(format(&segments), "取[と]り 扱[あつか]い");
/// ```
#[must_use]
pub fn derive_segments(headword: &str, reading: &str) -> Vec<Segment> {
    if headword.is_empty() {
        return Vec::new();
    }
    if reading.is_empty() || headword == reading {
        return vec![Segment::plain(headword)];
    }

    // split 取り扱い説明書
    // into [取, り, 扱, い, 説明書]
    let chunks = headword.char_indices().chunk_by(|(_, c)| is_kana(*c));
    let runs = chunks
        .into_iter()
        .filter_map(|(is_kana, mut chunk)| {
            let first = chunk.next()?;
            let last = chunk.last().unwrap_or(first);
            let text = &headword[first.0..last.0 + last.1.len_utf8()];
            Some((text, is_kana))
        })
        .collect::<Vec<_>>();

    let mut rest = reading;
    let mut segments = Vec::with_capacity(runs.len());
    let mut runs = runs.into_iter().peekable();
    while let Some((text, is_kana)) = runs.next() {
        if is_kana {
            rest = rest.strip_prefix(text).unwrap_or(rest);
            segments.push(Segment::plain(text));
            continue;
        }

        // everything in the reading up to the next kana run
        // is the reading of this run
        let this_reading = match runs.peek() {
            Some((next, _)) => match rest.split_once(*next) {
                Some((this_reading, _)) => {
                    rest = &rest[this_reading.len()..];
                    this_reading
                }
                None => std::mem::take(&mut rest),
            },
            None => std::mem::take(&mut rest),
        };
        segments.push(if this_reading.is_empty() {
            Segment::plain(text)
        } else {
            Segment::ruby(text, this_reading)
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use {super::*, jmdict_furigana::format};

    #[test]
    fn segments() {
        assert!(derive_segments("", "たべる").is_empty());
        assert_eq!(derive_segments("する", ""), [Segment::plain("する")]);
        assert_eq!(derive_segments("する", "する"), [Segment::plain("する")]);
        assert_eq!(
            derive_segments("日本", "にほん"),
            [Segment::ruby("日本", "にほん")]
        );
        assert_eq!(
            derive_segments("食べる", "たべる"),
            [Segment::ruby("食", "た"), Segment::plain("べる")]
        );
        assert_eq!(
            derive_segments("お茶", "おちゃ"),
            [Segment::plain("お"), Segment::ruby("茶", "ちゃ")]
        );
        assert_eq!(
            derive_segments("巻き込む", "まきこむ"),
            [
                Segment::ruby("巻", "ま"),
                Segment::plain("き"),
                Segment::ruby("込", "こ"),
                Segment::plain("む"),
            ]
        );
    }

    #[test]
    fn derived_markup() {
        assert_eq!(
            format(&derive_segments("取り扱い説明書", "とりあつかいせつめいしょ")),
            "取[と]り 扱[あつか]い 説明書[せつめいしょ]"
        );
        assert_eq!(format(&derive_segments("お茶", "おちゃ")), "お 茶[ちゃ]");
    }

    #[test]
    fn reading_does_not_align() {
        // the kana run isn't in the reading, so the first run takes it all
        assert_eq!(
            derive_segments("食べる", "くう"),
            [Segment::ruby("食", "くう"), Segment::plain("べる")]
        );
    }
}
