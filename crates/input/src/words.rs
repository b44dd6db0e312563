//! Reading short words typed on the keypad, terminated by `#`.

/// Key that ends a word early.
pub const WORD_TERMINATOR: char = '#';

/// Collect keys into a word until `#` is typed or `max_len` keys have been read.
///
/// The terminating `#` is consumed but not part of the word. Returns `None` if
/// `keys` runs dry before a single key arrives.
pub fn read_word<I>(keys: &mut I, max_len: usize) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut word = String::with_capacity(max_len);
    let mut read = 0;

    while read < max_len {
        let Some(key) = keys.next() else {
            break;
        };
        read += 1;
        if key == WORD_TERMINATOR {
            break;
        }
        word.push(key);
    }

    (read > 0).then_some(word)
}
