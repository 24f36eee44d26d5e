use crate::core::{Difficulty, Job, JobSummary};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Read-only task list served by the marketplace.
#[derive(Debug, Clone)]
pub struct Catalog {
    jobs: Vec<Job>,
}

#[derive(Deserialize)]
struct CatalogFile {
    jobs: Vec<Job>,
}

impl Catalog {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// 從 TOML 檔案載入任務清單 (`[[jobs]]` tables)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| MarketError::ConfigValidationError {
                field: "catalog".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        Ok(Self::new(file.jobs))
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn summaries(&self) -> Vec<JobSummary> {
        self.jobs.iter().map(JobSummary::from).collect()
    }

    pub fn find(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Looks up a job from a raw form value such as `"3"`, `" 3"` or `"3abc"`.
    pub fn resolve(&self, raw: &str) -> Option<&Job> {
        parse_leading_integer(raw).and_then(|id| self.find(id))
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            job(
                1,
                "Create a crypto tutorial video",
                "Record a short video (2-5 min) explaining a crypto concept like DeFi, NFTs, or staking. Post to YouTube, TikTok, or Twitter.",
                0.25,
                Difficulty::Medium,
                "45 min",
                "Does this show a video tutorial about crypto? Look for: educational content, clear explanation, 2-5 minutes length, posted publicly on a video platform.",
            ),
            job(
                2,
                "Write a smart contract",
                "Write a simple Solana or EVM smart contract (escrow, token, or basic DeFi). Include deployment instructions.",
                0.50,
                Difficulty::Hard,
                "2-4 hrs",
                "Does this show a working smart contract? Look for: code files, proper structure, deployment instructions, functional contract logic.",
            ),
            job(
                3,
                "Design crypto project banners",
                "Create a set of 3 social media banners for a crypto project (Twitter header 1500x500, Discord banner, and 1080x1080 square).",
                0.15,
                Difficulty::Easy,
                "30 min",
                "Does this show social media banners? Look for: multiple banner sizes, professional design quality, crypto/web3 aesthetic.",
            ),
            job(
                4,
                "Translate crypto docs to Spanish",
                "Translate a README or documentation (500+ words) from English to Spanish. Must be natural, not machine-translated.",
                0.20,
                Difficulty::Medium,
                "1 hr",
                "Does this show Spanish translation of crypto documentation? Look for: natural Spanish language, complete translation, proper formatting.",
            ),
            job(
                5,
                "Create crypto memes (set of 5)",
                "Make 5 high-quality memes about crypto, DeFi, NFTs, or trading. Must be funny, shareable, and original.",
                0.10,
                Difficulty::Easy,
                "20 min",
                "Does this show crypto-related memes? Look for: humor, shareability, crypto theme, at least 5 distinct memes, original content.",
            ),
            job(
                6,
                "Build a Telegram price bot",
                "Create a Telegram bot that fetches and displays crypto prices. Should support at least 5 tokens and have a /price command.",
                0.40,
                Difficulty::Hard,
                "3-5 hrs",
                "Does this show a Telegram bot for crypto prices? Look for: working bot code, Telegram API integration, price fetching, command handlers.",
            ),
            job(
                7,
                "Write a Twitter thread about DeFi",
                "Write a 5-7 tweet thread explaining a DeFi concept (yield farming, liquidity pools, etc.). Post it live on Twitter/X.",
                0.08,
                Difficulty::Easy,
                "15 min",
                "Does this show a Twitter thread about DeFi? Look for: 5-7 tweets, educational content about DeFi, posted publicly.",
            ),
            job(
                8,
                "Research DEX comparison",
                "Create a comparison doc analyzing 5 DEXs (Uniswap, Jupiter, Raydium, etc.). Compare features, fees, chains, and volume.",
                0.18,
                Difficulty::Medium,
                "1.5 hrs",
                "Does this show a comparison of DEX platforms? Look for: at least 5 DEXs compared, features/fees analysis, structured document format.",
            ),
            job(
                9,
                "Create ASCII art logo",
                "Design ASCII art for a crypto project. Should look good in monospace fonts and fit within 80 chars width.",
                0.06,
                Difficulty::Easy,
                "20 min",
                "Does this show ASCII art? Look for: recognizable design, fits in 80 character width, looks good in monospace, creative/crypto themed.",
            ),
            job(
                10,
                "Find and report a bug",
                "Find a real bug in an open-source crypto project, document reproduction steps, and submit a GitHub issue.",
                0.15,
                Difficulty::Medium,
                "varies",
                "Does this show a valid bug report? Look for: clear reproduction steps, actual bug, GitHub issue link, detailed description.",
            ),
        ])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Validate for Catalog {
    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(MarketError::ConfigValidationError {
                field: "catalog.jobs".to_string(),
                message: "Catalog must contain at least one job".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id) {
                return Err(MarketError::InvalidConfigValueError {
                    field: "catalog.jobs.id".to_string(),
                    value: job.id.to_string(),
                    reason: "Duplicate job id".to_string(),
                });
            }
            if !job.reward.is_finite() || job.reward <= 0.0 {
                return Err(MarketError::InvalidConfigValueError {
                    field: format!("catalog.jobs[{}].reward", job.id),
                    value: job.reward.to_string(),
                    reason: "Reward must be a positive amount".to_string(),
                });
            }
            crate::utils::validation::validate_non_empty_string(
                &format!("catalog.jobs[{}].title", job.id),
                &job.title,
            )?;
            crate::utils::validation::validate_non_empty_string(
                &format!("catalog.jobs[{}].verification_prompt", job.id),
                &job.verification_prompt,
            )?;
        }

        Ok(())
    }
}

fn job(
    id: u32,
    title: &str,
    description: &str,
    reward: f64,
    difficulty: Difficulty,
    time_estimate: &str,
    verification_prompt: &str,
) -> Job {
    Job {
        id,
        title: title.to_string(),
        description: description.to_string(),
        reward,
        difficulty,
        time_estimate: time_estimate.to_string(),
        verification_prompt: verification_prompt.to_string(),
    }
}

/// 寬鬆整數解析：略過前導空白，只取開頭的數字
fn parse_leading_integer(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.validate().is_ok());

        let ids: Vec<u32> = catalog.jobs().iter().map(|j| j.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_resolve_is_lenient_about_form_values() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.resolve("3").unwrap().title, "Design crypto project banners");
        assert_eq!(catalog.resolve("  7").unwrap().id, 7);
        assert_eq!(catalog.resolve("2abc").unwrap().id, 2);
        assert!(catalog.resolve("abc").is_none());
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("11").is_none());
        assert!(catalog.resolve("-1").is_none());
    }

    #[test]
    fn test_summaries_keep_catalog_order() {
        let summaries = Catalog::builtin().summaries();
        assert_eq!(summaries[0].id, 1);
        assert_eq!(summaries[1].reward, 0.50);
        assert_eq!(summaries[9].time_estimate, "varies");
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = Catalog::from_toml_str(
            r#"
[[jobs]]
id = 42
title = "Record a podcast intro"
description = "30 seconds of audio"
reward = 0.05
difficulty = "Easy"
time_estimate = "10 min"
verification_prompt = "Is this a podcast intro?"
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let job = catalog.find(42).unwrap();
        assert_eq!(job.difficulty, Difficulty::Easy);
        assert_eq!(job.verification_prompt, "Is this a podcast intro?");
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_rewards() {
        let mut jobs = Catalog::builtin().jobs().to_vec();
        jobs[1].id = 1;
        assert!(Catalog::new(jobs).validate().is_err());

        let mut jobs = Catalog::builtin().jobs().to_vec();
        jobs[0].reward = 0.0;
        assert!(Catalog::new(jobs).validate().is_err());

        assert!(Catalog::new(vec![]).validate().is_err());
    }
}
