//! Cumulative release notes between two configuration versions.

/// Version a fully provisioned profile is recorded at.
pub const CURRENT_CONFIG_VERSION: u32 = 6;

/// Per-version bullet lists, ascending. Version 1 was the initial release
/// and announces nothing.
const CHANGES: &[(u32, &[&str])] = &[
    (
        2,
        &[
            "Shell integration moved under ~/.config/glint/zsh with a single managed loader",
            "Plugins install per-user; nothing is written system-wide",
        ],
    ),
    (
        3,
        &[
            "git diffs now render through delta (side-by-side, line numbers)",
            "Only unset git options are touched; your overrides always win",
        ],
    ),
    (
        4,
        &["New plugin: history substring search on the arrow keys"],
    ),
    (
        5,
        &[
            "Refreshed managed theme defaults (Coldark-Dark)",
            "Theme files you have edited are detected and never overwritten",
        ],
    ),
    (
        6,
        &[
            "Window size is remembered across restarts",
            "Older marker files consolidate into a single state record",
        ],
    ),
];

/// Bullet items for every version in `(from, to]`, ascending. An empty or
/// inverted span yields an empty sequence.
pub fn announce(from: u32, to: u32) -> Vec<String> {
    let mut items = Vec::new();
    for (version, bullets) in CHANGES {
        if *version > from && *version <= to {
            for bullet in *bullets {
                items.push(format!("v{version}: {bullet}"));
            }
        }
    }
    items
}
