/// Length of the longest common subsequence, using the two-row O(min(m,n)) space algorithm.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let (m, n) = (a.len(), b.len());
    if m == 0 || n == 0 {
        return 0;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, n) = if n <= m { (a, b, n) } else { (b, a, m) };

    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for ca in a {
        for j in 1..=n {
            curr[j] = if *ca == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_length(a, b) as f64 / total as f64
}

/// Best similarity between the shorter string and any equally long window of
/// the longer one that starts at a word boundary. A verbatim occurrence scores 100.
pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
    let (needle, haystack) = if s1.chars().count() <= s2.chars().count() {
        (s1, s2)
    } else {
        (s2, s1)
    };
    if needle.is_empty() {
        return 0.0;
    }
    if haystack.contains(needle) {
        return 100.0;
    }

    let needle: Vec<char> = needle.chars().collect();
    let haystack: Vec<char> = haystack.chars().collect();

    word_starts(&haystack)
        .map(|start| {
            let end = (start + needle.len()).min(haystack.len());
            ratio_chars(&needle, &haystack[start..end])
        })
        .fold(0.0, f64::max)
}

fn word_starts(chars: &[char]) -> impl Iterator<Item = usize> + '_ {
    (0..chars.len()).filter(move |&i| {
        chars[i].is_alphanumeric() && (i == 0 || !chars[i - 1].is_alphanumeric())
    })
}
