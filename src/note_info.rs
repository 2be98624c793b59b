/**
 * A held note. Its velocity is not kept, arpeggiated notes are always played at full velocity.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteInfo {
    pub note: u8,
    pub channel: u8,
}

impl NoteInfo {
    pub fn new(note: u8, channel: u8) -> Self {
        Self { note, channel }
    }
}
