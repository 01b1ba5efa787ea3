//! URL-safe aliases derived from display names.
//!
//! Aliases are the deduplication key for tags: two names that normalise to the
//! same alias refer to the same tag.

/// Normalise `name` into a lower-case, dash separated ASCII alias.
///
/// Accented Latin letters (including the Vietnamese alphabet) are folded to
/// their base letter, every other run of non-alphanumeric characters becomes a
/// single dash, and leading/trailing dashes are dropped.
pub fn make_alias(name: &str) -> String {
    let mut alias = String::with_capacity(name.len());
    let mut last_dash = true;

    for ch in name.chars().flat_map(char::to_lowercase) {
        let folded = fold_diacritic(ch);
        if folded.is_ascii_alphanumeric() {
            alias.push(folded);
            last_dash = false;
        } else if !last_dash {
            alias.push('-');
            last_dash = true;
        }
    }

    while alias.ends_with('-') {
        alias.pop();
    }

    alias
}

/// Split a comma separated tag string into `(name, alias)` pairs.
///
/// Names are trimmed, empty entries and entries without any alphanumeric
/// character are skipped, and later duplicates of an alias are dropped while
/// the order of first appearance is kept.
pub fn parse_tag_list(raw: &str) -> Vec<(String, String)> {
    let mut seen = Vec::new();
    let mut tags = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let alias = make_alias(name);
        if alias.is_empty() || seen.contains(&alias) {
            continue;
        }
        seen.push(alias.clone());
        tags.push((name.to_string(), alias));
    }

    tags
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ'
        | 'ẫ' | 'ậ' | 'ä' | 'å' | 'ā' | 'ą' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' | 'ē' | 'ę' | 'ě' => {
            'e'
        }
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' | 'ī' | 'ı' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' | 'ū' | 'ů'
        | 'ű' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' | 'ÿ' => 'y',
        'đ' | 'ď' => 'd',
        'ç' | 'ć' | 'č' => 'c',
        'ñ' | 'ń' | 'ň' => 'n',
        'ś' | 'š' | 'ş' => 's',
        'ź' | 'ż' | 'ž' => 'z',
        'ł' => 'l',
        'ř' => 'r',
        'ť' => 't',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_lowercases_and_dashes() {
        assert_eq!(make_alias("Smart Phone"), "smart-phone");
        assert_eq!(make_alias("  USB-C  / Lightning "), "usb-c-lightning");
        assert_eq!(make_alias("4K TV"), "4k-tv");
    }

    #[test]
    fn alias_folds_vietnamese_diacritics() {
        assert_eq!(make_alias("Điện thoại"), "dien-thoai");
        assert_eq!(make_alias("Máy tính bảng"), "may-tinh-bang");
    }

    #[test]
    fn alias_of_punctuation_only_is_empty() {
        assert_eq!(make_alias("!!!"), "");
        assert_eq!(make_alias(""), "");
    }

    #[test]
    fn tag_list_deduplicates_by_alias() {
        let tags = parse_tag_list("Phone, phone ,PHONE,Tablet");

        assert_eq!(
            tags,
            vec![
                ("Phone".to_string(), "phone".to_string()),
                ("Tablet".to_string(), "tablet".to_string()),
            ]
        );
    }

    #[test]
    fn tag_list_skips_empty_entries() {
        let tags = parse_tag_list(",, ,#,Laptop,");

        assert_eq!(tags, vec![("Laptop".to_string(), "laptop".to_string())]);
    }
}
