//! Virtual-museum gallery cards, in dataset order.

use crate::config::MediaConfig;
use crate::model::{MediaKind, MuseumItem};
use crate::notice::{Notice, NoticeKind, View};

const DEFAULT_CATEGORY: &str = "Exhibit";

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub image_alt: String,
}

impl GalleryCard {
    fn from_item(item: &MuseumItem, media: &MediaConfig) -> Self {
        let primary = item.media.iter().find(|m| m.kind == MediaKind::Image);
        let category = if item.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            item.category.clone()
        };

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category,
            description: item.description.clone(),
            image: primary
                .map(|m| m.url.clone())
                .unwrap_or_else(|| media.placeholder_image.clone()),
            image_alt: primary
                .and_then(|m| m.alt.clone())
                .unwrap_or_else(|| media.placeholder_alt.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Gallery {
    cards: Vec<GalleryCard>,
    in_view: Option<String>,
}

impl Gallery {
    pub fn build(items: &[MuseumItem], media: &MediaConfig) -> (Self, Option<Notice>) {
        let cards: Vec<_> = items
            .iter()
            .map(|item| GalleryCard::from_item(item, media))
            .collect();
        let notice = cards.is_empty().then(|| {
            Notice::new(
                NoticeKind::EmptyView(View::Gallery),
                "No exhibits in the virtual museum yet.",
            )
        });

        (
            Self {
                cards,
                in_view: None,
            },
            notice,
        )
    }

    pub fn cards(&self) -> &[GalleryCard] {
        &self.cards
    }

    /// Card ids in display order; the tour cycles through this sequence.
    pub fn display_order(&self) -> Vec<String> {
        self.cards.iter().map(|card| card.id.clone()).collect()
    }

    pub fn bring_into_view(&mut self, id: &str) {
        self.in_view = Some(id.to_string());
    }

    /// Card most recently scrolled into view.
    pub fn in_view(&self) -> Option<&str> {
        self.in_view.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn cards_fall_back_to_placeholders() {
        let media = MediaConfig::default();
        let (gallery, notice) = Gallery::build(&testing::sample_data().museum, &media);

        assert!(notice.is_none());
        let drum = gallery.cards().iter().find(|c| c.id == "m-drum").unwrap();
        assert_eq!(drum.image, media.placeholder_image);
        assert_eq!(drum.category, DEFAULT_CATEGORY);

        let sword = gallery.cards().iter().find(|c| c.id == "m-sword").unwrap();
        assert_eq!(sword.image, "assets/images/sword.jpg");
        assert_eq!(sword.image_alt, "Iron sword");
    }

    #[test]
    fn empty_museum_raises_inline_notice() {
        let (gallery, notice) = Gallery::build(&[], &MediaConfig::default());

        assert!(gallery.display_order().is_empty());
        assert_eq!(notice.unwrap().kind, NoticeKind::EmptyView(View::Gallery));
    }
}
