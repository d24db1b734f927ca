//! Timed lyric cues in LRC form (`[mm:ss.cc] text`).

/// One cue: show `text` from `time_s` onward.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    pub time_s: f64,
    pub text: String,
}

/// Parse an LRC cue sheet. Lines without a leading `[mm:ss.cc]` tag, and
/// tags with nothing after them, are skipped. Cues come back sorted by time.
pub fn parse_lrc(src: &str) -> Vec<Cue> {
    let mut cues: Vec<Cue> = src.lines().filter_map(parse_line).collect();
    cues.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
    cues
}

fn parse_line(line: &str) -> Option<Cue> {
    let rest = line.trim_start().strip_prefix('[')?;
    let (tag, text) = rest.split_once(']')?;
    let (mm, ss) = tag.split_once(':')?;
    let (ss, cc) = ss.split_once('.')?;
    let field = |s: &str| -> Option<u32> {
        (s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())).then(|| s.parse().ok())?
    };
    let (mm, ss, cc) = (field(mm)?, field(ss)?, field(cc)?);

    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(Cue {
        time_s: mm as f64 * 60.0 + ss as f64 + cc as f64 / 100.0,
        text: text.to_string(),
    })
}

/// Playback cursor over a cue list.
#[derive(Clone, Debug, Default)]
pub struct LyricTrack {
    cues: Vec<Cue>,
    active: Option<usize>,
}

impl LyricTrack {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues, active: None }
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn active(&self) -> Option<&Cue> {
        self.active.map(|i| &self.cues[i])
    }

    /// Move to the last cue at or before `time_s`. Returns the new line (or
    /// `Some(None)` for "no line") only when the active cue changed.
    pub fn advance(&mut self, time_s: f64) -> Option<Option<&str>> {
        let idx = self.cues.partition_point(|c| c.time_s <= time_s).checked_sub(1);
        if idx == self.active {
            return None;
        }
        self.active = idx;
        Some(idx.map(|i| self.cues[i].text.as_str()))
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
