//! Built-in vault for trying the player without an export.

use sonic_graph::GraphNode;

const TOPICS: [&str; 12] = [
    "Harmony", "Tides", "Compilers", "Gardening", "Orbits", "Mycelium", "Typography", "Glaciers",
    "Rhythm", "Lighthouses", "Bread", "Cartography",
];
const KINDS: [&str; 6] = ["Notes", "Sketch", "Index", "Journal", "Reading", "Draft"];
const FOLDERS: [&str; 5] = ["", "inbox/", "projects/", "projects/archive/", "media/"];
const EXTENSIONS: [&str; 8] = ["md", "md", "md", "png", "pdf", "mp3", "mp4", "canvas"];

/// 2024-01-01 in ms
const EPOCH_MS: i64 = 1_704_067_200_000;
const DAY_MS: i64 = 86_400_000;

/// Deterministic vault of `size` nodes with a few hubs and mixed file types
pub fn vault(size: usize) -> Vec<GraphNode> {
    (0..size)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            let kind = KINDS[(i / TOPICS.len()) % KINDS.len()];
            let title = format!("{topic} {kind}");
            let folder = FOLDERS[(i * 7) % FOLDERS.len()];
            let ext = EXTENSIONS[(i * 5) % EXTENSIONS.len()];
            let path = format!("{folder}{}-{i}.{ext}", title.to_lowercase().replace(' ', "-"));

            // Every node links back to its topic hub and one earlier node
            let mut links = Vec::new();
            if i >= TOPICS.len() {
                links.push(format!("n{}", i % TOPICS.len()));
            }
            if i > 0 {
                links.push(format!("n{}", i * 5 / 7));
            }

            GraphNode::new(format!("n{i}"), title, path)
                .with_file_size(200 + ((i as u64 * 7_919) % 60_000))
                .with_connections(links)
                .with_creation_date(EPOCH_MS + (i as i64 * 3 + (i as i64 % 5)) * DAY_MS)
        })
        .collect()
}
