//! Product browser: category tabs, showcase panels and the contact modal.

use atlantmetal_cart::CartStore;
use atlantmetal_catalog::{Catalog, PriceItem, ProductCategory};

/// A past delivery or popular size shown on a category panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseEntry {
    pub title: &'static str,
    pub price_label: &'static str,
    pub city: &'static str,
    pub status: &'static str,
}

/// Static copy for one category tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPanel {
    pub category: ProductCategory,
    pub headline: &'static str,
    pub range: &'static str,
    pub description: &'static str,
    pub cta_label: &'static str,
    /// Goes into the contact modal title: `Заказать <subject>`.
    pub order_subject: &'static str,
    pub showcase_heading: &'static str,
    pub showcase: Vec<ShowcaseEntry>,
}

const DELIVERED: &str = "Доставлено";

fn entry(title: &'static str, price_label: &'static str, city: &'static str) -> ShowcaseEntry {
    ShowcaseEntry {
        title,
        price_label,
        city,
        status: DELIVERED,
    }
}

impl CategoryPanel {
    pub fn for_category(category: ProductCategory) -> Self {
        match category {
            ProductCategory::Circles => Self {
                category,
                headline: "Стальные круги",
                range: "Диаметры от 6 до 350 мм • 32 марки стали",
                description: "Самый широкий ассортимент стальных кругов в Казахстане. \
                    Привозим редкие марки стали, которых нет на местном рынке. \
                    Каждая партия проходит строжайший контроль качества на российских заводах.",
                cta_label: "Заказать круги",
                order_subject: "стальные круги",
                showcase_heading: "Последние поставки:",
                showcase: vec![
                    entry("Круг 350 мм ст.09Г2С — 180 метров", "2.1 млн ₸", "Алматы"),
                    entry("Круг ст. 38ХС ф280 — 19.5 тонн", "8.7 млн ₸", "Шымкент"),
                ],
            },
            ProductCategory::Pipes => Self {
                category,
                headline: "Стальные трубы",
                range: "Диаметры от 32 до 530 мм • Бесшовные и электросварные",
                description: "Полный ассортимент стальных труб для любых задач. \
                    Бесшовные трубы для высокого давления, электросварные для строительства. \
                    Все трубы соответствуют ГОСТ стандартам.",
                cta_label: "Заказать трубы",
                order_subject: "стальные трубы",
                showcase_heading: "Популярные размеры:",
                showcase: vec![
                    entry("Труба 108×6 бесшовная — 24 тонны", "3.2 млн ₸", "Челябинск"),
                    entry("Труба 89×4 электросварная — 18 тонн", "1.8 млн ₸", "Новосибирск"),
                ],
            },
            ProductCategory::Profile => Self {
                category,
                headline: "Профильные трубы",
                range: "Квадратные и прямоугольные • От 15×15 до 200×200",
                description: "Идеальное решение для металлоконструкций и каркасов. \
                    Высокое качество сварки, точные геометрические размеры. \
                    Подходят для любых строительных и производственных задач.",
                cta_label: "Заказать профиль",
                order_subject: "профильные трубы",
                showcase_heading: "Популярные размеры:",
                showcase: vec![
                    entry("Профиль 100×100×6 — 15 тонн", "2.1 млн ₸", "Екатеринбург"),
                    entry("Профиль 60×60×4 — 22 тонны", "1.9 млн ₸", "Оренбург"),
                ],
            },
        }
    }
}

/// Contact modal opened by a category call-to-action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactModal {
    title: Option<String>,
}

impl ContactModal {
    pub fn is_open(&self) -> bool {
        self.title.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn open(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn close(&mut self) {
        self.title = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub category: ProductCategory,
    pub label: &'static str,
    pub active: bool,
}

/// Catalog item plus how many cart lines reference it.
#[derive(Debug, Clone, Copy)]
pub struct CatalogCard<'a> {
    pub item: &'a PriceItem,
    pub in_cart: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ProductBrowser {
    active: ProductCategory,
    modal: ContactModal,
}

impl ProductBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> ProductCategory {
        self.active
    }

    pub fn select_tab(&mut self, category: ProductCategory) {
        if self.active != category {
            tracing::debug!(tab = category.as_str(), "tab selected");
        }
        self.active = category;
    }

    pub fn tabs(&self) -> Vec<Tab> {
        ProductCategory::ALL
            .iter()
            .map(|&category| Tab {
                category,
                label: category.display_name(),
                active: category == self.active,
            })
            .collect()
    }

    pub fn active_panel(&self) -> CategoryPanel {
        CategoryPanel::for_category(self.active)
    }

    /// Open the contact modal for `category`'s call-to-action.
    pub fn order_click(&mut self, category: ProductCategory) {
        let panel = CategoryPanel::for_category(category);
        self.modal.open(format!("Заказать {}", panel.order_subject));
    }

    pub fn modal(&self) -> &ContactModal {
        &self.modal
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// Items of the active tab with their cart badge counts.
    pub fn cards<'a>(&self, catalog: &'a Catalog, cart: &CartStore) -> Vec<CatalogCard<'a>> {
        catalog
            .by_category(self.active)
            .map(|item| CatalogCard {
                item,
                in_cart: cart.count_for_catalog_item(item.id()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use atlantmetal_storage::MemoryStorage;

    use crate::checkout::tests::line;

    #[test]
    fn starts_on_circles() {
        let browser = ProductBrowser::new();
        assert_eq!(browser.active_tab(), ProductCategory::Circles);

        let tabs = browser.tabs();
        assert_eq!(tabs.len(), 3);
        assert!(tabs[0].active);
        assert_eq!(tabs[0].label, "Стальные круги");
        assert!(!tabs[1].active && !tabs[2].active);
    }

    #[test]
    fn selecting_a_tab_switches_panel() {
        let mut browser = ProductBrowser::new();
        browser.select_tab(ProductCategory::Profile);

        let panel = browser.active_panel();
        assert_eq!(panel.headline, "Профильные трубы");
        assert_eq!(panel.cta_label, "Заказать профиль");
        assert_eq!(panel.showcase_heading, "Популярные размеры:");
        assert_eq!(panel.showcase[0].city, "Екатеринбург");
    }

    #[test]
    fn every_panel_has_showcase_entries() {
        for category in ProductCategory::ALL {
            let panel = CategoryPanel::for_category(category);
            assert_eq!(panel.category, category);
            assert_eq!(panel.showcase.len(), 2);
            assert!(panel.showcase.iter().all(|e| e.status == "Доставлено"));
            assert!(!panel.description.contains("  "));
        }
    }

    #[test]
    fn cta_opens_titled_modal() {
        let mut browser = ProductBrowser::new();
        assert!(!browser.modal().is_open());

        browser.order_click(ProductCategory::Pipes);
        assert_eq!(browser.modal().title(), Some("Заказать стальные трубы"));

        browser.close_modal();
        assert!(!browser.modal().is_open());
        assert_eq!(browser.modal().title(), None);
    }

    #[test]
    fn cards_carry_cart_badges() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = CartStore::open(Arc::new(MemoryStorage::new()));
        cart.add(line(1.0)).unwrap();
        cart.add(line(2.0)).unwrap();

        let browser = ProductBrowser::new();
        let cards = browser.cards(&catalog, &cart);
        assert_eq!(cards.len(), catalog.by_category(ProductCategory::Circles).count());

        let badge = |id: u32| cards.iter().find(|c| c.item.id().get() == id).unwrap().in_cart;
        assert_eq!(badge(3), 2);
        assert_eq!(badge(1), 0);
    }
}
