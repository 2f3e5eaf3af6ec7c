// ABOUTME: Defines StageName and StageSpec, the five fixed agent roles of the pipeline.
// ABOUTME: Each spec carries its instruction template as data plus a search capability flag.

use serde::{Deserialize, Serialize};

/// Instruction for the clarifier stage, whose output feeds every later prompt.
const CLARIFIER_INSTRUCTION: &str = "You are a business idea clarifier. Take the raw business \
    idea and refine it into a well-defined concept: identify the core value proposition, the \
    target market and customer segments, the key features and benefits, and how the business \
    makes money.\n\n\
    Always respond with this structure:\n\
    - CLARIFIED IDEA: [clear, concise description]\n\
    - VALUE PROPOSITION: [what problem it solves]\n\
    - TARGET MARKET: [who will buy it]\n\
    - KEY FEATURES: [main features and benefits]\n\
    - BUSINESS MODEL: [how it makes money]";

const MARKET_RESEARCHER_INSTRUCTION: &str = "You are a market research specialist. Research the \
    market for the clarified business idea: market size and growth potential, market dynamics \
    and opportunities, the regulatory environment, and market risks.\n\n\
    You have access to a web_search tool. Use it to gather current data, and explicitly cite or \
    summarize the search results you used in your analysis. If no relevant results come back, \
    state that explicitly and continue from your own knowledge.\n\n\
    Always respond with:\n\
    - MARKET SIZE: [estimated market size, with sources where available]\n\
    - GROWTH TREND: [market growth direction]\n\
    - KEY TRENDS: [relevant market trends]\n\
    - REGULATORY FACTORS: [legal and regulatory considerations]\n\
    - MARKET RISKS: [potential market challenges]\n\
    - SOURCES: [the search results you drew on, or a note that none were found]";

const COMPETITOR_SCOUT_INSTRUCTION: &str = "You are a competitive intelligence specialist. \
    Identify direct and indirect competitors for the clarified business idea, analyze their \
    strengths, weaknesses, business models and pricing, and suggest how to position against \
    them.\n\n\
    You have access to a web_search tool. Use it to find current competitors, and explicitly \
    cite or summarize the search results you used. If no relevant results come back, state \
    that explicitly and continue from your own knowledge.\n\n\
    Always respond with:\n\
    - DIRECT COMPETITORS: [list with brief descriptions]\n\
    - INDIRECT COMPETITORS: [list with brief descriptions]\n\
    - COMPETITIVE LANDSCAPE: [market positioning analysis]\n\
    - COMPETITIVE ADVANTAGES: [how to differentiate]\n\
    - COMPETITIVE THREATS: [what to watch out for]\n\
    - SOURCES: [the search results you drew on, or a note that none were found]";

const SWOT_ANALYST_INSTRUCTION: &str = "You are a SWOT analysis specialist. Using the clarified \
    idea, the market research, and the competitive analysis above, analyze the business idea's \
    strengths, weaknesses, opportunities, and threats, prioritize the most important factors, \
    and suggest strategies to leverage or address them.\n\n\
    Always respond with a structured SWOT analysis:\n\
    - STRENGTHS: [key strengths]\n\
    - WEAKNESSES: [key weaknesses]\n\
    - OPPORTUNITIES: [key opportunities]\n\
    - THREATS: [key threats]\n\
    - STRATEGIC RECOMMENDATIONS: [action items]";

const FEEDBACK_AGENT_INSTRUCTION: &str = "You are a business strategy consultant. Review all \
    previous analyses and provide strategic feedback: improvements and pivots for the idea, \
    potential business model innovations, and concrete next steps for validating it.\n\n\
    Always respond with:\n\
    - STRATEGIC FEEDBACK: [overall assessment]\n\
    - IMPROVEMENT SUGGESTIONS: [specific recommendations]\n\
    - POTENTIAL PIVOTS: [alternative directions]\n\
    - VALIDATION STEPS: [next steps to test the idea]\n\
    - SUCCESS FACTORS: [key things to focus on]";

/// Identifies one of the five fixed agent roles, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageName {
    Clarifier,
    MarketResearcher,
    CompetitorScout,
    SwotAnalyst,
    FeedbackAgent,
}

impl StageName {
    /// All stage names in pipeline order.
    pub const ALL: [StageName; 5] = [
        StageName::Clarifier,
        StageName::MarketResearcher,
        StageName::CompetitorScout,
        StageName::SwotAnalyst,
        StageName::FeedbackAgent,
    ];

    /// Return a snake_case identifier for this stage, used in logging.
    pub fn label(&self) -> &'static str {
        match self {
            StageName::Clarifier => "clarifier",
            StageName::MarketResearcher => "market_researcher",
            StageName::CompetitorScout => "competitor_scout",
            StageName::SwotAnalyst => "swot_analyst",
            StageName::FeedbackAgent => "feedback_agent",
        }
    }

    /// Return the fixed report section heading for this stage.
    pub fn section_title(&self) -> &'static str {
        match self {
            StageName::Clarifier => "Clarified Business Idea",
            StageName::MarketResearcher => "Market Research",
            StageName::CompetitorScout => "Competitive Analysis",
            StageName::SwotAnalyst => "SWOT Analysis",
            StageName::FeedbackAgent => "Strategic Feedback",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of one pipeline stage: its role, its instruction
/// template, and whether the agent may invoke the web-search tool mid-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageSpec {
    pub name: StageName,
    pub instruction: &'static str,
    pub search_enabled: bool,
}

/// Return the five fixed stage specs in declared pipeline order.
///
/// Only the market researcher and competitor scout carry the search
/// capability; the other stages work purely from accumulated context.
pub const fn pipeline_stages() -> [StageSpec; 5] {
    [
        StageSpec {
            name: StageName::Clarifier,
            instruction: CLARIFIER_INSTRUCTION,
            search_enabled: false,
        },
        StageSpec {
            name: StageName::MarketResearcher,
            instruction: MARKET_RESEARCHER_INSTRUCTION,
            search_enabled: true,
        },
        StageSpec {
            name: StageName::CompetitorScout,
            instruction: COMPETITOR_SCOUT_INSTRUCTION,
            search_enabled: true,
        },
        StageSpec {
            name: StageName::SwotAnalyst,
            instruction: SWOT_ANALYST_INSTRUCTION,
            search_enabled: false,
        },
        StageSpec {
            name: StageName::FeedbackAgent,
            instruction: FEEDBACK_AGENT_INSTRUCTION,
            search_enabled: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_five_stages_in_declared_order() {
        let stages = pipeline_stages();
        assert_eq!(stages.len(), 5);

        let names: Vec<StageName> = stages.iter().map(|s| s.name).collect();
        assert_eq!(names, StageName::ALL.to_vec());
        assert_eq!(names[0], StageName::Clarifier);
        assert_eq!(names[4], StageName::FeedbackAgent);
    }

    #[test]
    fn only_research_stages_carry_the_search_tool() {
        for stage in pipeline_stages() {
            let expected = matches!(
                stage.name,
                StageName::MarketResearcher | StageName::CompetitorScout
            );
            assert_eq!(
                stage.search_enabled, expected,
                "search flag mismatch for {}",
                stage.name
            );
        }
    }

    #[test]
    fn instructions_are_non_empty_and_structured() {
        for stage in pipeline_stages() {
            assert!(
                !stage.instruction.is_empty(),
                "instruction for {} should not be empty",
                stage.name
            );
            assert!(
                stage.instruction.contains("Always respond with"),
                "instruction for {} should demand a structured response",
                stage.name
            );
        }
    }

    #[test]
    fn search_stages_mention_the_tool() {
        for stage in pipeline_stages() {
            assert_eq!(
                stage.instruction.contains("web_search"),
                stage.search_enabled,
                "only search-enabled stages should reference web_search ({})",
                stage.name
            );
        }
    }

    #[test]
    fn section_titles_are_fixed() {
        assert_eq!(StageName::Clarifier.section_title(), "Clarified Business Idea");
        assert_eq!(StageName::MarketResearcher.section_title(), "Market Research");
        assert_eq!(StageName::CompetitorScout.section_title(), "Competitive Analysis");
        assert_eq!(StageName::SwotAnalyst.section_title(), "SWOT Analysis");
        assert_eq!(StageName::FeedbackAgent.section_title(), "Strategic Feedback");
    }

    #[test]
    fn stage_label_round_trips_through_display() {
        for name in StageName::ALL {
            assert_eq!(format!("{}", name), name.label());
        }
    }
}
