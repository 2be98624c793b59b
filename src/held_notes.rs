use crate::note_info::NoteInfo;

const MIDI_NOTES: usize = 128;

/**
 * The notes currently held down, ordered by note number, one entry per note number.
 */
#[derive(Debug, Clone)]
pub struct HeldNotes {
    notes: Vec<NoteInfo>,
}

impl Default for HeldNotes {
    fn default() -> Self {
        Self {
            notes: Vec::with_capacity(MIDI_NOTES),
        }
    }
}

impl HeldNotes {
    /**
     * Add a note. Pressing a note that is already held keeps the first entry.
     */
    pub fn note_on(&mut self, note_info: NoteInfo) {
        if note_info.note as usize >= MIDI_NOTES {
            return;
        }
        if let Err(index) = self.search(note_info.note) {
            self.notes.insert(index, note_info);
        }
    }

    pub fn note_off(&mut self, note: u8) {
        if let Ok(index) = self.search(note) {
            self.notes.remove(index);
        }
    }

    pub fn get(&self, index: usize) -> Option<&NoteInfo> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    fn search(&self, note: u8) -> Result<usize, usize> {
        self.notes.binary_search_by_key(&note, |held| held.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(notes: &[u8]) -> HeldNotes {
        let mut held_notes = HeldNotes::default();
        for note in notes {
            held_notes.note_on(NoteInfo::new(*note, 0));
        }
        held_notes
    }

    fn note_numbers(held_notes: &HeldNotes) -> Vec<u8> {
        (0..held_notes.len())
            .filter_map(|index| held_notes.get(index))
            .map(|held| held.note)
            .collect()
    }

    #[test]
    fn notes_are_kept_sorted() {
        let held_notes = held(&[67, 60, 64]);
        assert_eq!(note_numbers(&held_notes), vec![60, 64, 67]);
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut held_notes = held(&[60, 60]);
        held_notes.note_on(NoteInfo::new(60, 3));
        assert_eq!(held_notes.len(), 1);
        assert_eq!(held_notes.get(0).map(|held| held.channel), Some(0));
    }

    #[test]
    fn note_off_removes_only_that_note() {
        let mut held_notes = held(&[60, 64]);
        held_notes.note_off(60);
        held_notes.note_off(72);
        assert_eq!(note_numbers(&held_notes), vec![64]);
        held_notes.note_off(64);
        assert!(held_notes.is_empty());
    }

    #[test]
    fn out_of_range_notes_are_rejected() {
        let held_notes = held(&[128, 255]);
        assert!(held_notes.is_empty());
    }
}
