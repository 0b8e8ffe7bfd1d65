//! サーバーカードの端末表示

use colored::{ColoredString, Colorize};
use dflow_core::{Accent, AddressTone, NO_PUBLIC_IP_LABEL, ServerCard, StatusIcon};

/// アクセント色で着色
pub fn paint(text: &str, accent: Accent) -> ColoredString {
    match accent {
        Accent::Purple => text.magenta(),
        Accent::Blue => text.blue(),
        Accent::Red => text.red(),
        Accent::Amber => text.yellow(),
        Accent::Yellow => text.bright_yellow(),
        Accent::Green => text.green(),
        Accent::Gray => text.dimmed(),
    }
}

fn icon_glyph(icon: Option<StatusIcon>) -> &'static str {
    match icon {
        Some(StatusIcon::Cloud) => "☁ ",
        Some(StatusIcon::Settings) => "⚙ ",
        Some(StatusIcon::AlertCircle) => "⚠ ",
        Some(StatusIcon::WifiOff) => "✗ ",
        None => "✓ ",
    }
}

/// 一覧表示（ps / watch）
pub fn print_table(cards: &[ServerCard]) {
    if cards.is_empty() {
        println!("{}", "サーバーはありません".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<20} {:<26} {:<18} {:<12}",
            "NAME", "STATUS", "ADDRESS", "PROVIDER"
        )
        .bold()
    );
    println!("{}", "─".repeat(79).dimmed());

    for card in cards {
        let status = format!("{}{}", icon_glyph(card.icon), card.badge_label);
        let address = if card.address.advisory.is_some() {
            format!("{} *", card.address.value)
        } else {
            card.address.value.clone()
        };

        println!(
            "{:<20} {:<26} {:<18} {:<12}",
            card.name.cyan(),
            paint(&status, card.accent),
            address,
            card.provider.dimmed()
        );
    }

    if cards.iter().any(|c| c.address.advisory.is_some()) {
        println!();
        println!(
            "{}",
            "* Tailscale経由でのみ接続可能（パブリックIPなし）".dimmed()
        );
    }
}

/// カード表示（show）
pub fn print_card(card: &ServerCard) {
    let mut header = format!(
        "{} {}",
        card.name.bold(),
        paint(
            &format!("[{}{}]", icon_glyph(card.icon), card.badge_label),
            card.accent
        )
    );
    if card.dpkg_lock.is_some() {
        header.push_str(&format!(" {}", "🔒".bright_yellow()));
    }
    println!("{}", header);
    println!("  {}", card.description.dimmed());

    if let Some(alert) = &card.alert {
        println!();
        println!("  {} {}", "⚠".yellow(), alert.title.yellow().bold());
        println!("    {}", alert.message);
    }

    if let Some(advisory) = card.address.advisory {
        println!("  {} {}", NO_PUBLIC_IP_LABEL.yellow(), advisory.dimmed());
    }

    if let Some(tooltip) = card.badge.tooltip {
        println!("  {}", tooltip.dimmed());
    }

    if let Some(banner) = &card.banner {
        println!();
        println!("  {} {}", "┃".dimmed(), paint(card.title, card.accent).bold());
        println!("  {} {}", "┃".dimmed(), card.subtitle);
        if let Some(progress) = banner.progress {
            println!(
                "  {} 接続試行: {}/{}",
                "┃".dimmed(),
                progress.attempts.saturating_add(1),
                progress.max_attempts
            );
        }
    }

    println!();
    let address_value = match card.address.tone {
        AddressTone::Plain => card.address.value.normal(),
        AddressTone::Highlighted => card.address.value.cyan(),
        AddressTone::Muted => card.address.value.dimmed(),
    };
    println!("  {:<14} {}", card.address.label, address_value);
    println!("  {:<14} {}", "Provider", card.provider.blue());
    if let Some(billing) = &card.next_billing {
        println!("  {:<14} {}", "Next Billing", billing.date);
    }
    if let Some(link) = &card.link {
        println!("  {:<14} {}", "Link", link.dimmed());
    }
}
