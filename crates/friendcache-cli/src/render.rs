//! Plain-text list and detail views.

use std::io::{self, Write};

use friendcache_core::utils::{fit_column, format_date, format_tags};
use friendcache_core::User;

/// Width of the name column in the list view
const NAME_WIDTH: usize = 28;

/// Width of the company column in the list view
const COMPANY_WIDTH: usize = 16;

/// One line per user: status, name, company, id
pub fn render_list<W: Write>(out: &mut W, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        writeln!(out, "No users cached yet.")?;
        return Ok(());
    }

    for user in users {
        let marker = if user.is_active { "●" } else { "○" };
        writeln!(
            out,
            "{} {} {} {}",
            marker,
            fit_column(&user.name, NAME_WIDTH),
            fit_column(&user.company, COMPANY_WIDTH),
            user.id
        )?;
    }
    writeln!(out, "{} users", users.len())
}

pub fn render_detail<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    writeln!(out, "{} ({})", user.name, user.status_label())?;
    writeln!(out, "  Age:        {}", user.age)?;
    writeln!(out, "  Company:    {}", user.company)?;
    writeln!(out, "  Email:      {}", user.email)?;
    writeln!(out, "  Address:    {}", user.address)?;
    writeln!(out, "  Registered: {}", format_date(&user.registered))?;
    writeln!(out, "  Tags:       {}", format_tags(&user.tags))?;
    writeln!(out)?;
    writeln!(out, "{}", user.about)?;
    writeln!(out)?;
    writeln!(out, "Friends ({}):", user.friends.len())?;
    for friend in &user.friends {
        writeln!(out, "  - {}", friend.name)?;
    }
    Ok(())
}
