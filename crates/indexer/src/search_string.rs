use percent_encoding::percent_decode_str;
use url::Url;

/// Builds the string the host matcher scores a tab against.
///
/// Parts, in order: the title, the hostname with a leading `www.` removed and
/// dots turned into spaces, and the path with every non-ASCII-letter turned
/// into a space. The result is whitespace-normalized; empty parts vanish.
///
/// The path is percent-decoded and an IDNA host is shown in Unicode, so both
/// match what the user typed. Urls that do not parse as absolute are treated
/// as a bare path.
#[must_use]
pub fn build_search_string(title: &str, url: &str) -> String {
    let (host, path) = split_url(url);

    let mut parts: Vec<String> = Vec::with_capacity(3);
    parts.push(title.to_string());
    if let Some(host) = host {
        let host = host.strip_prefix("www.").unwrap_or(&host);
        parts.push(host.replace('.', " "));
    }
    if let Some(path) = path {
        parts.push(letters_only(&path));
    }

    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_url(url: &str) -> (Option<String>, Option<String>) {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed
                .host_str()
                .filter(|h| !h.is_empty())
                .map(unicode_host);
            let path = Some(parsed.path())
                .filter(|p| !p.is_empty())
                .map(|p| percent_decode_str(p).decode_utf8_lossy().into_owned());
            (host, path)
        }
        Err(_) => (None, Some(url.to_string()).filter(|u| !u.is_empty())),
    }
}

fn unicode_host(host: &str) -> String {
    match idna::domain_to_unicode(host) {
        (unicode, Ok(())) => unicode,
        (_, Err(_)) => host.to_string(),
    }
}

fn letters_only(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect()
}
