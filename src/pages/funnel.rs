//! Funnel Analysis page

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::{select_range, Loadable, PageController, PageKind, RangeSelection};
use crate::format::{DateRange, RangePreset, Tone};
use crate::insights::{FunnelData, InsightsApi, InsightsResult};

const LOW_OPEN_THRESHOLD: f64 = 30.0;
const LOW_CLICK_THRESHOLD: f64 = 20.0;
const STRONG_OVERALL_THRESHOLD: f64 = 5.0;

pub struct FunnelPage {
    range: RangeSelection,
    state: Loadable<FunnelData>,
}

impl Default for FunnelPage {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelPage {
    pub fn new() -> Self {
        Self {
            range: RangeSelection::Preset(PageKind::Funnel.default_range()),
            state: Loadable::new(),
        }
    }

    pub fn with_range(mut self, range: impl Into<RangeSelection>) -> Self {
        self.range = range.into();
        self
    }
}

#[async_trait]
impl PageController for FunnelPage {
    type Request = DateRange;
    type Data = FunnelData;

    const KIND: PageKind = PageKind::Funnel;

    fn range(&self) -> &RangeSelection {
        &self.range
    }

    fn set_range(&mut self, preset: RangePreset) -> bool {
        select_range(Self::KIND, &mut self.range, preset)
    }

    fn request(&self, today: NaiveDate) -> DateRange {
        self.range.resolve(today)
    }

    async fn fetch(api: &dyn InsightsApi, range: &DateRange) -> InsightsResult<FunnelData> {
        api.funnel(range).await
    }

    fn state(&self) -> &Loadable<FunnelData> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut Loadable<FunnelData> {
        &mut self.state
    }
}

/// Leads lost across all stages; absent without drop-off data
pub fn total_drop_off(funnel: &FunnelData) -> Option<i64> {
    funnel.drop_off.as_ref().map(|d| d.total())
}

/// Caption under each stage heading, by position
pub fn stage_caption(index: usize) -> Option<&'static str> {
    match index {
        0 => Some("Initial email delivery"),
        1 => Some("Recipients who opened the email"),
        2 => Some("Recipients who clicked links"),
        3 => Some("Recipients who replied"),
        _ => None,
    }
}

/// Threshold-based recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunnelInsight {
    LowOpenRate,
    ImproveClickThrough,
    GreatOverallConversion,
}

impl FunnelInsight {
    pub fn title(self) -> &'static str {
        match self {
            FunnelInsight::LowOpenRate => "Low Open Rate",
            FunnelInsight::ImproveClickThrough => "Improve Click-Through Rate",
            FunnelInsight::GreatOverallConversion => "Great Overall Conversion",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            FunnelInsight::LowOpenRate => {
                "Your open rate is below 30%. Consider improving your subject lines and sender reputation."
            }
            FunnelInsight::ImproveClickThrough => {
                "Consider adding more compelling CTAs and value propositions in your email content."
            }
            FunnelInsight::GreatOverallConversion => {
                "Your overall conversion rate is strong! Keep up the good work with your current strategies."
            }
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            FunnelInsight::LowOpenRate => Tone::Warning,
            FunnelInsight::ImproveClickThrough => Tone::Info,
            FunnelInsight::GreatOverallConversion => Tone::Success,
        }
    }

    /// Insights that apply to a funnel, in display order.
    ///
    /// Nothing applies to a funnel without stages; a null conversion never
    /// crosses a threshold.
    pub fn evaluate(funnel: &FunnelData) -> Vec<FunnelInsight> {
        let mut out = Vec::new();
        if funnel.stages.is_empty() {
            return out;
        }

        let conversion = |i: usize| funnel.stages.get(i).and_then(|s| s.conversion_rate);
        if conversion(0).is_some_and(|rate| rate < LOW_OPEN_THRESHOLD) {
            out.push(FunnelInsight::LowOpenRate);
        }
        if conversion(1).is_some_and(|rate| rate < LOW_CLICK_THRESHOLD) {
            out.push(FunnelInsight::ImproveClickThrough);
        }
        if funnel
            .overall_conversion_rate
            .is_some_and(|rate| rate > STRONG_OVERALL_THRESHOLD)
        {
            out.push(FunnelInsight::GreatOverallConversion);
        }
        out
    }
}
