use crate::errors::ParseError;

/// Time utilities for frame-accurate timeline conversion
///
/// This module converts between the three time representations the
/// converter deals in: decimal seconds, rational frame-tick fractions
/// tied to a project frame rate (`3003/30000s`), and SRT clock strings
/// (`HH:MM:SS,mmm`).
/// A project frame rate expressed as the rational duration of one frame tick.
///
/// One tick lasts `numerator / denominator` seconds; `1001/30000` is 29.97fps.
/// Timeline time values must be exact multiples of the tick, which the
/// encoding functions enforce by flooring. The rate is always passed
/// explicitly so that two conversions with different rates cannot interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    /// Seconds-per-tick numerator
    pub numerator: i64,

    /// Seconds-per-tick denominator
    pub denominator: i64,
}

impl FrameRate {
    // @creates: Validated frame rate from tick components
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, ParseError> {
        if numerator <= 0 || denominator <= 0 {
            return Err(ParseError::FrameRate {
                numerator,
                denominator,
            });
        }

        Ok(FrameRate {
            numerator,
            denominator,
        })
    }

    /// Parse an fcpxml `frameDuration` attribute (`"1001/30000s"` or `"1s"`)
    pub fn from_frame_duration(value: &str) -> Result<Self, ParseError> {
        let body = value
            .strip_suffix('s')
            .ok_or_else(|| ParseError::FrameDuration(value.to_string()))?;

        let (numerator, denominator) = match body.split_once('/') {
            Some((num, den)) => {
                let num: i64 = num
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::FrameDuration(value.to_string()))?;
                let den: i64 = den
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::FrameDuration(value.to_string()))?;
                (num, den)
            }
            // whole-second tick, e.g. a 1fps preview template
            None => {
                let num: i64 = body
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::FrameDuration(value.to_string()))?;
                (num, 1)
            }
        };

        Self::new(numerator, denominator)
    }

    // @returns: Frames per second implied by the tick duration
    pub fn fps(&self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }

    // @returns: Tick duration in seconds
    pub fn tick_seconds(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for FrameRate {
    /// 29.97fps, the converter's sanity-check default
    fn default() -> Self {
        FrameRate {
            numerator: 1001,
            denominator: 30000,
        }
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}s", self.numerator, self.denominator)
    }
}

/// Encode seconds as a timeline time value quantized to the frame grid.
///
/// The tick count is floored toward zero: a clip boundary must land exactly
/// on a frame start and must never pass the true elapsed time. Whole-second
/// results render as `"5s"`, everything else as `"{ticks}/{denominator}s"`
/// (never reduced further).
pub fn seconds_to_timeline(t: f64, rate: &FrameRate) -> String {
    let scaled = (t * rate.denominator as f64) as i64;
    let x = (scaled / rate.numerator) * rate.numerator;

    if x % rate.denominator == 0 {
        format!("{}s", x / rate.denominator)
    } else {
        format!("{}/{}s", x, rate.denominator)
    }
}

/// Decode a timeline time value (`"5s"` or `"90090/30000s"`) into seconds.
pub fn timeline_to_seconds(value: &str) -> Result<f64, ParseError> {
    let body = value
        .strip_suffix('s')
        .ok_or_else(|| ParseError::TimelineValue(value.to_string()))?;

    match body.split_once('/') {
        Some((num, den)) => {
            let num: i64 = num
                .trim()
                .parse()
                .map_err(|_| ParseError::TimelineValue(value.to_string()))?;
            let den: i64 = den
                .trim()
                .parse()
                .map_err(|_| ParseError::TimelineValue(value.to_string()))?;

            if den == 0 {
                return Err(ParseError::TimelineValue(value.to_string()));
            }

            Ok(num as f64 / den as f64)
        }
        None => body
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::TimelineValue(value.to_string())),
    }
}

/// Format seconds as an SRT clock string (`HH:MM:SS,mmm`).
///
/// The millisecond remainder is truncated, not rounded. Hours are unbounded;
/// there is no 24h wrap.
pub fn seconds_to_clock(t: f64) -> String {
    let t_int = t as i64;
    let ms = ((t - t_int as f64) * 1000.0) as i64;
    let s = t_int % 60;
    let m = (t_int / 60) % 60;
    let h = t_int / 3600;

    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Combine SRT clock components into seconds.
pub fn clock_to_seconds(hours: u64, minutes: u64, seconds: u64, millis: u64) -> f64 {
    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0
}
