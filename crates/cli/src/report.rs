use skill_auditor::{
    percent, AuditReport, CompatibilityReport, CostReport, DuplicityReport,
};
use skill_budget::{CostBand, Impact};
use skill_capability::Access;
use skill_similarity::{DuplicatePair, DuplicityThresholds, PairTier};

pub fn render_duplicity_report(out: &DuplicityReport, thresholds: &DuplicityThresholds) -> String {
    let mut md = String::new();
    md.push_str("# Skill duplicity report\n\n");
    md.push_str(&format!("- Skills: `{}`\n", out.documents));
    md.push_str(&format!("- Average similarity: `{}%`\n", out.average));
    md.push_str(&format!(
        "- High (≥{}%): `{}`, moderate (≥{}%): `{}`, low: `{}`\n\n",
        thresholds.high,
        out.high_pairs.len(),
        thresholds.moderate,
        out.moderate_pairs.len(),
        out.low_pair_count
    ));

    md.push_str("## Matrix\n\n");
    let names: Vec<&str> = out.matrix.names().collect();
    md.push_str("| Skill |");
    for name in &names {
        md.push_str(&format!(" {} |", escape_cell(name)));
    }
    md.push_str("\n|---|");
    md.push_str(&"---:|".repeat(names.len()));
    md.push('\n');
    for first in &names {
        md.push_str(&format!("| {} |", escape_cell(first)));
        for second in &names {
            let score = out.matrix.score(first, second).unwrap_or(0);
            let cell = if first == second {
                score.to_string()
            } else {
                match thresholds.tier(score) {
                    PairTier::High => format!("**{score}**"),
                    PairTier::Moderate => format!("*{score}*"),
                    PairTier::Low => score.to_string(),
                }
            };
            md.push_str(&format!(" {cell} |"));
        }
        md.push('\n');
    }
    md.push('\n');

    md.push_str("## High duplicity pairs\n\n");
    push_pairs(&mut md, &out.high_pairs);
    md.push_str("## Moderate duplicity pairs\n\n");
    push_pairs(&mut md, &out.moderate_pairs);

    md.push_str("## Most duplicated skills\n\n");
    if out.most_duplicated.is_empty() {
        md.push_str("_None._\n\n");
    } else {
        md.push_str("| rank | skill | high pairs | max score |\n");
        md.push_str("|---:|---|---:|---:|\n");
        for (rank, entry) in out.most_duplicated.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {}% |\n",
                rank + 1,
                escape_cell(&entry.name),
                entry.high_pairs,
                entry.max_score
            ));
        }
        md.push('\n');
    }

    md.push_str("## Recommendations\n\n");
    md.push_str(&format!(
        "- Merge (≥{}%): {}\n",
        thresholds.merge,
        pair_list(&out.merge_candidates)
    ));
    md.push_str(&format!(
        "- Consolidate ({}-{}%): {}\n",
        thresholds.consolidation,
        thresholds.merge.saturating_sub(1),
        pair_list(&out.consolidation_candidates)
    ));
    md.push_str(&format!(
        "- Extract shared framework: {}\n",
        pair_list(&out.moderate_pairs)
    ));
    md
}

pub fn render_token_report(out: &CostReport) -> String {
    let summary = &out.summary;
    let critical = summary.bands.get(&CostBand::Critical).copied().unwrap_or(0);

    let mut md = String::new();
    md.push_str("# Skill token report\n\n");
    md.push_str(&format!("- Skills: `{}`\n", summary.documents));
    md.push_str(&format!("- Total tokens: `{}`\n", summary.total_units));
    md.push_str(&format!("- Average tokens: `{}`\n", summary.average_units));
    md.push_str(&format!(
        "- Oversized: `{}` ({}%), critical: `{}` ({}%)\n",
        summary.oversized,
        percent(summary.oversized, summary.documents),
        critical,
        percent(critical, summary.documents)
    ));
    md.push_str(&format!(
        "- Potential savings: `~{}` tokens\n\n",
        summary.potential_savings
    ));

    md.push_str("## Skills\n\n");
    md.push_str("| skill | chars | tokens | band | code blocks | category |\n");
    md.push_str("|---|---:|---:|---|---:|---|\n");
    for record in out.ranked() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&record.name),
            record.chars,
            record.units,
            record.band,
            record.code_blocks,
            escape_cell(&record.category)
        ));
    }
    md.push('\n');

    md.push_str("## Oversized skills\n\n");
    let oversized: Vec<_> = out
        .ranked()
        .into_iter()
        .filter(|record| record.band.is_oversized())
        .collect();
    if oversized.is_empty() {
        md.push_str("_None._\n\n");
    } else {
        md.push_str("| skill | tokens | band | recommendation |\n");
        md.push_str("|---|---:|---|---|\n");
        for record in oversized {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(&record.name),
                record.units,
                record.band,
                record
                    .recommendation
                    .map_or("-".to_string(), |r| r.to_string())
            ));
        }
        md.push('\n');
    }

    md.push_str("## Categories\n\n");
    md.push_str("| category | skills | avg tokens | total tokens | share |\n");
    md.push_str("|---|---:|---:|---:|---:|\n");
    for (category, cost) in &summary.categories {
        let share = if summary.total_units == 0 {
            0
        } else {
            cost.total_units * 100 / summary.total_units
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {share}% |\n",
            escape_cell(category),
            cost.count,
            cost.average_units,
            cost.total_units
        ));
    }
    md.push('\n');

    for (impact, title) in [
        (Impact::High, "High-impact targets"),
        (Impact::Medium, "Medium-impact targets"),
        (Impact::Low, "Low-impact targets"),
    ] {
        md.push_str(&format!("## {title}\n\n"));
        let targets: Vec<_> = out
            .ranked()
            .into_iter()
            .filter(|record| record.savings.impact == impact)
            .collect();
        if targets.is_empty() {
            md.push_str("_None._\n\n");
            continue;
        }
        md.push_str("| skill | savings | tokens | code blocks | chars |\n");
        md.push_str("|---|---:|---:|---:|---:|\n");
        for record in targets {
            md.push_str(&format!(
                "| {} | ~{} | {} | {} | {} |\n",
                escape_cell(&record.name),
                record.savings.units,
                record.units,
                record.code_blocks,
                record.chars
            ));
        }
        md.push('\n');
    }
    md
}

pub fn render_suitability_report(out: &CompatibilityReport) -> String {
    let mut md = String::new();
    md.push_str("# Subagent suitability report\n\n");
    md.push_str(&format!("- Skills: `{}`\n", out.documents));
    md.push_str(&format!("- Profiles: `{}`\n\n", out.profiles.len()));

    md.push_str("## Profiles\n\n");
    md.push_str("| profile | access | compatible | share |\n");
    md.push_str("|---|---|---:|---:|\n");
    for profile in &out.profiles {
        let access = match profile.access {
            Access::Unrestricted => "unrestricted",
            Access::Restricted => "restricted",
        };
        md.push_str(&format!(
            "| {} | {access} | {} | {}% |\n",
            escape_cell(&profile.name),
            profile.compatible,
            percent(profile.compatible, out.documents)
        ));
    }
    md.push('\n');

    md.push_str("## Requirements\n\n");
    md.push_str("| requirement | skills | share |\n");
    md.push_str("|---|---:|---:|\n");
    for flag in &out.flags {
        md.push_str(&format!(
            "| {} | {} | {}% |\n",
            flag.flag,
            flag.documents,
            percent(flag.documents, out.documents)
        ));
    }
    md.push('\n');

    md.push_str("## Compatibility matrix\n\n");
    md.push_str("| skill |");
    for profile in &out.profiles {
        md.push_str(&format!(" {} |", escape_cell(&profile.name)));
    }
    md.push_str("\n|---|");
    md.push_str(&":---:|".repeat(out.profiles.len()));
    md.push('\n');
    for name in out.matrix.documents() {
        md.push_str(&format!("| {} |", escape_cell(name)));
        for profile in &out.profiles {
            let ok = out
                .matrix
                .row(name)
                .and_then(|row| row.get(&profile.name))
                .copied()
                .unwrap_or(false);
            md.push_str(if ok { " ✓ |" } else { " ✗ |" });
        }
        md.push('\n');
    }
    md.push('\n');

    md.push_str("## Unrestricted only\n\n");
    let only = out.unrestricted_only();
    if only.is_empty() {
        md.push_str("_None._\n");
    } else {
        for name in only {
            md.push_str(&format!("- {name}\n"));
        }
    }
    md
}

pub fn render_audit_report(out: &AuditReport, thresholds: &DuplicityThresholds) -> String {
    [
        render_duplicity_report(&out.duplicity, thresholds),
        render_token_report(&out.cost),
        render_suitability_report(&out.compatibility),
    ]
    .join("\n")
}

fn push_pairs(md: &mut String, pairs: &[DuplicatePair]) {
    if pairs.is_empty() {
        md.push_str("_None._\n\n");
        return;
    }
    md.push_str("| skill | skill | score |\n");
    md.push_str("|---|---|---:|\n");
    for pair in pairs {
        md.push_str(&format!(
            "| {} | {} | {}% |\n",
            escape_cell(&pair.first),
            escape_cell(&pair.second),
            pair.score
        ));
    }
    md.push('\n');
}

fn pair_list(pairs: &[DuplicatePair]) -> String {
    if pairs.is_empty() {
        return "none".to_string();
    }
    pairs
        .iter()
        .map(|pair| format!("{}/{}", pair.first, pair.second))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
