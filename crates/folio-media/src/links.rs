//! Local media references as seen from a rendered document.

use std::path::{self, Component, Path};

use folio_blocks::{Block, MediaBlock, Node, walk, walk_mut};

use crate::resolver::is_remote;

/// Rewrite absolute local media references in `tree` relative to `base`,
/// the directory the rendered document is written to.
///
/// Links use `/` separators and climb out of `base` with `..` when the media
/// lives elsewhere. Remote URLs and relative references are left alone.
pub fn relative_links(tree: &mut [Node], base: &Path) {
    let base = path::absolute(base).unwrap_or_else(|_| base.to_path_buf());
    walk_mut(tree, &mut |node| {
        let Some(media) = media_of(&mut node.block) else {
            return;
        };
        let Some(local) = media.url().filter(|url| is_local_path(url)) else {
            return;
        };
        if let Some(link) = relative_path(Path::new(local), &base) {
            media.set_url(link);
        }
    });
}

/// Ids of nodes whose absolute local media reference no longer exists.
pub fn missing_media(tree: &[Node]) -> Vec<String> {
    let mut missing = Vec::new();
    walk(tree, &mut |node| {
        let url = media_url(&node.block);
        if url.is_some_and(|url| is_local_path(url) && !Path::new(url).exists()) {
            missing.push(node.id.clone());
        }
    });
    missing
}

fn media_of(block: &mut Block) -> Option<&mut MediaBlock> {
    match block {
        Block::Image(m) | Block::Video(m) | Block::Audio(m) | Block::File(m) | Block::Pdf(m) => {
            Some(m)
        }
        _ => None,
    }
}

fn media_url(block: &Block) -> Option<&str> {
    match block {
        Block::Image(m) | Block::Video(m) | Block::Audio(m) | Block::File(m) | Block::Pdf(m) => {
            m.url()
        }
        _ => None,
    }
}

fn is_local_path(url: &str) -> bool {
    !is_remote(url) && Path::new(url).is_absolute()
}

/// `path` relative to `base`, or `None` when they share no root.
fn relative_path(path: &Path, base: &Path) -> Option<String> {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return None;
    }

    let mut parts: Vec<String> = base[common..]
        .iter()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|_| "..".to_owned())
        .collect();
    parts.extend(path[common..].iter().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    }));
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_blocks::TextBlock;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn image(id: &str, url: &str) -> Node {
        Node::new(id, Block::Image(MediaBlock::hosted(url)))
    }

    fn url_of(node: &Node) -> &str {
        match &node.block {
            Block::Image(m) => m.url().unwrap_or_default(),
            _ => "",
        }
    }

    #[test]
    fn test_link_inside_base() {
        let mut tree = vec![image("i", "/site/out/images/a.png")];
        relative_links(&mut tree, Path::new("/site/out"));
        assert_eq!(url_of(&tree[0]), "images/a.png");
    }

    #[test]
    fn test_link_outside_base_climbs() {
        let mut tree = vec![
            Node::new("t", Block::Toggle(TextBlock::default()))
                .with_children(vec![image("i", "/site/assets/media/a.png")]),
        ];
        relative_links(&mut tree, Path::new("/site/out/v2"));
        assert_eq!(url_of(&tree[0].children()[0]), "../../assets/media/a.png");
    }

    #[test]
    fn test_remote_and_relative_links_untouched() {
        let mut tree = vec![
            image("r", "https://files.example.com/a.png"),
            image("l", "images/a.png"),
        ];
        relative_links(&mut tree, Path::new("/site/out"));

        assert_eq!(url_of(&tree[0]), "https://files.example.com/a.png");
        assert_eq!(url_of(&tree[1]), "images/a.png");
    }

    #[test]
    fn test_missing_media_reports_deleted_files() {
        let tmp = TempDir::new().unwrap();
        let kept = tmp.path().join("kept.png");
        std::fs::write(&kept, b"png").unwrap();

        let tree = vec![
            image("kept", &kept.to_string_lossy()),
            image("gone", &tmp.path().join("gone.png").to_string_lossy()),
            image("remote", "https://files.example.com/a.png"),
        ];

        assert_eq!(missing_media(&tree), ["gone"]);
    }
}
