//! File names of recordings on the card.
//!
//! ```text
//! rec_0004_temp.wav                   while recording
//! rec_0004_00-05.wav                  after finalization (mm-ss)
//! rec_0004_orphan_20240101T120000.wav temp file of an abandoned session
//! ```

pub fn temp_file_name(sequence: u32) -> String {
    format!("rec_{:04}_temp.wav", sequence)
}

/// `mm-ss`, each zero-padded to two digits. Minutes keep counting past 99.
pub fn format_duration(duration_secs: u64) -> String {
    format!("{:02}-{:02}", duration_secs / 60, duration_secs % 60)
}

pub fn final_file_name(sequence: u32, duration_secs: u64) -> String {
    format!("rec_{:04}_{}.wav", sequence, format_duration(duration_secs))
}

pub fn orphan_file_name(sequence: u32, stamp: &str) -> String {
    format!("rec_{:04}_orphan_{}.wav", sequence, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(temp_file_name(4), "rec_0004_temp.wav");
        assert_eq!(final_file_name(4, 5), "rec_0004_00-05.wav");
        assert_eq!(final_file_name(123, 61), "rec_0123_01-01.wav");
        assert_eq!(final_file_name(12345, 0), "rec_12345_00-00.wav");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "00-00");
        assert_eq!(format_duration(59), "00-59");
        assert_eq!(format_duration(600), "10-00");
        assert_eq!(format_duration(6000), "100-00");
    }
}
