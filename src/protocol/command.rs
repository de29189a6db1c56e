// Command parsing for the line-oriented trainer protocol
//
// Keywords are case-insensitive. Anything that does not parse is not an
// error: unrecognized lines are ignored by the protocol.

/// A recognized command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `R` - report anchors, flags, and totals
    Status,
    /// `F` - set the fresh anchor from a live acquisition
    SetFreshAnchor,
    /// `S` - set the spoil anchor from a live acquisition
    SetSpoilAnchor,
    /// `TRAIN:ON` - enable periodic telemetry streaming
    StreamOn,
    /// `TRAIN:OFF` - disable telemetry streaming
    StreamOff,
    /// `SNAP` - request one telemetry frame on the next tick
    Snapshot,
    /// `MODEL:RESET` - clear trained flag and totals, keep anchors
    ResetModel,
    /// `CSVTEST:BEGIN` - enter session ingest
    SessionBegin,
    /// `CSVTEST:END` - close the session (error outside of ingest)
    SessionEnd,
    /// `CSVACCUM:ON` - completed sessions add to the running totals
    AccumulateOn,
    /// `CSVACCUM:OFF` - completed sessions replace the running totals
    AccumulateOff,
    /// `CSVACCUM:CLEAR` - zero totals, keep anchors and trained flag
    ClearTotals,
    /// `TFLAG?` - query the trained flag
    QueryTrainedFlag,
    /// `TFLAG:0` / `TFLAG:1` - force the trained flag
    SetTrainedFlag(bool),
}

impl Command {
    /// Parse one trimmed input line
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim().to_ascii_uppercase().as_str() {
            "R" => Some(Command::Status),
            "F" => Some(Command::SetFreshAnchor),
            "S" => Some(Command::SetSpoilAnchor),
            "TRAIN:ON" => Some(Command::StreamOn),
            "TRAIN:OFF" => Some(Command::StreamOff),
            "SNAP" => Some(Command::Snapshot),
            "MODEL:RESET" => Some(Command::ResetModel),
            "CSVTEST:BEGIN" => Some(Command::SessionBegin),
            "CSVTEST:END" => Some(Command::SessionEnd),
            "CSVACCUM:ON" => Some(Command::AccumulateOn),
            "CSVACCUM:OFF" => Some(Command::AccumulateOff),
            "CSVACCUM:CLEAR" => Some(Command::ClearTotals),
            "TFLAG?" => Some(Command::QueryTrainedFlag),
            "TFLAG:0" => Some(Command::SetTrainedFlag(false)),
            "TFLAG:1" => Some(Command::SetTrainedFlag(true)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_keywords() {
        assert_eq!(Command::parse("R"), Some(Command::Status));
        assert_eq!(Command::parse("F"), Some(Command::SetFreshAnchor));
        assert_eq!(Command::parse("S"), Some(Command::SetSpoilAnchor));
        assert_eq!(Command::parse("TRAIN:ON"), Some(Command::StreamOn));
        assert_eq!(Command::parse("TRAIN:OFF"), Some(Command::StreamOff));
        assert_eq!(Command::parse("SNAP"), Some(Command::Snapshot));
        assert_eq!(Command::parse("MODEL:RESET"), Some(Command::ResetModel));
        assert_eq!(Command::parse("CSVTEST:BEGIN"), Some(Command::SessionBegin));
        assert_eq!(Command::parse("CSVTEST:END"), Some(Command::SessionEnd));
        assert_eq!(Command::parse("CSVACCUM:ON"), Some(Command::AccumulateOn));
        assert_eq!(Command::parse("CSVACCUM:OFF"), Some(Command::AccumulateOff));
        assert_eq!(Command::parse("CSVACCUM:CLEAR"), Some(Command::ClearTotals));
        assert_eq!(Command::parse("TFLAG?"), Some(Command::QueryTrainedFlag));
        assert_eq!(
            Command::parse("TFLAG:0"),
            Some(Command::SetTrainedFlag(false))
        );
        assert_eq!(
            Command::parse("TFLAG:1"),
            Some(Command::SetTrainedFlag(true))
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("r"), Some(Command::Status));
        assert_eq!(Command::parse("train:on"), Some(Command::StreamOn));
        assert_eq!(Command::parse("CsvTest:Begin"), Some(Command::SessionBegin));
        assert_eq!(Command::parse("tflag:1"), Some(Command::SetTrainedFlag(true)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Command::parse("  R \r"), Some(Command::Status));
        assert_eq!(Command::parse("\tSNAP\n"), Some(Command::Snapshot));
    }

    #[test]
    fn test_parse_rejects_unknown_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("HELLO"), None);
        assert_eq!(Command::parse("TFLAG:2"), None);
        assert_eq!(Command::parse("CSVTEST:"), None);
        assert_eq!(Command::parse("1300,1,1300,2700"), None);
    }
}
