//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{PageId, Site};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Menus, their pages and the detached pages of `site` as a tree.
pub fn site_tree(site: &Site, verbose: bool) -> Tree<String> {
    let mut root = Tree::new(site.to_string());

    for (id, menu) in site.menus() {
        let mut label = format!("{} [menu {}]", menu.title, menu.order);
        if menu.privileged {
            label.push_str(" privileged");
        }
        if site.system_menu() == Some(id) {
            label.push_str(" system");
        }
        let mut node = Tree::new(label);
        for page in &menu.items {
            node.push(page_tree(site, *page, verbose));
        }
        root.push(node);
    }

    let detached: Vec<PageId> = site
        .pages()
        .filter(|(_, p)| p.menu.is_none() && p.parent.is_none())
        .map(|(id, _)| id)
        .collect();
    if !detached.is_empty() {
        let mut node = Tree::new("(detached)".to_string());
        for page in detached {
            node.push(page_tree(site, page, verbose));
        }
        root.push(node);
    }
    root
}

fn page_tree(site: &Site, id: PageId, verbose: bool) -> Tree<String> {
    let Some(page) = site.page(id) else {
        return Tree::new("?".to_string());
    };
    let mut label = format!("{} /{}", page.title, page.slug);
    if site.initial_page() == Some(id) {
        label.push_str(" (initial)");
    }
    if verbose {
        let components: Vec<String> = page.components.iter().map(|c| c.describe(site)).collect();
        label.push_str(&format!(" [{}]", components.join(", ")));
    }
    if let Some(group) = &page.can_view {
        label.push_str(&format!(" can_view: {}", group));
    }
    let mut node = Tree::new(label);
    for child in &page.children {
        node.push(page_tree(site, *child, verbose));
    }
    node
}
