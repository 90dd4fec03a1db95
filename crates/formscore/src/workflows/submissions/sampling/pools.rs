use super::super::domain::QualityTier;

pub(super) const DISPOSABLE_DOMAINS: [&str; 5] = [
    "tempmail.com",
    "mailinator.com",
    "10minutemail.com",
    "guerrillamail.com",
    "throwaway.email",
];

pub(super) const SPAM_PHRASES: [&str; 9] = [
    "click here",
    "buy now",
    "limited time",
    "make money fast",
    "free money",
    "weight loss",
    "viagra",
    "casino",
    "winner",
];

pub(super) const POOR_CHOICES: [&str; 4] = ["Other", "Not sure", "Not sure yet", "Need guidance"];
pub(super) const FAIR_CHOICES: [&str; 4] = ["Other", "Not sure", "Flexible", "No preference"];

pub(super) fn names(tier: QualityTier) -> &'static [&'static str] {
    match tier {
        QualityTier::Excellent => &[
            "Michael Anderson",
            "Sarah Thompson",
            "Jennifer Martinez",
            "David Chen",
            "Alexandra Wilson",
            "Robert Johnson",
            "Emily Rodriguez",
            "James Taylor",
            "Amanda Brown",
        ],
        QualityTier::Good => &[
            "John Smith",
            "Mary Johnson",
            "Robert Wilson",
            "Jennifer Davis",
            "Michael Brown",
            "Lisa Garcia",
        ],
        QualityTier::Fair => &["mike", "sarah", "john doe", "jane smith", "bob jones"],
        QualityTier::Poor => &["test", "user", "test user", "asdf", "qwerty"],
    }
}

pub(super) fn companies(tier: QualityTier) -> &'static [&'static str] {
    match tier {
        QualityTier::Excellent => &[
            "TechCorp Solutions",
            "Digital Innovations Inc",
            "Global Ventures LLC",
            "Strategic Partners Group",
            "Innovation Dynamics",
            "Premier Business Solutions",
        ],
        QualityTier::Good => &[
            "Smith Consulting",
            "Johnson & Associates",
            "Brown Services",
            "Wilson Enterprises",
            "Davis Solutions",
        ],
        QualityTier::Fair => &["My Company", "ABC Inc", "The Company"],
        QualityTier::Poor => &["test", "company", "test company"],
    }
}

pub(super) fn subjects(tier: QualityTier) -> &'static [&'static str] {
    match tier {
        QualityTier::Excellent => &[
            "Partnership Opportunity",
            "Project Consultation Request",
            "Service Inquiry",
            "Detailed Quote Request",
            "Business Proposal",
        ],
        QualityTier::Good => &[
            "Question about services",
            "Need information",
            "Interested in product",
            "Service inquiry",
            "Request for quote",
        ],
        QualityTier::Fair => &["question", "info", "inquiry", "need help"],
        QualityTier::Poor => &["test", "hello", "hi", ""],
    }
}

pub(super) fn plain_text(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Excellent => "Professional input provided",
        QualityTier::Good => "Valid information",
        QualityTier::Fair => "basic info",
        QualityTier::Poor => "test",
    }
}

pub(super) fn message(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Excellent => {
            "I am writing to express my interest in your services. I have reviewed your offerings \
             and believe there is a strong alignment with our needs. I would appreciate the \
             opportunity to discuss this further at your earliest convenience. Please let me know \
             your availability for a detailed consultation."
        }
        QualityTier::Good => {
            "I'm interested in learning more about your services. Could you please provide \
             additional information about pricing and availability? Thank you."
        }
        QualityTier::Fair => "need more info about services",
        QualityTier::Poor => "test message",
    }
}

pub(super) fn email_domains(tier: QualityTier) -> &'static [&'static str] {
    match tier {
        QualityTier::Excellent => &["company.com", "business.com", "corporation.com"],
        QualityTier::Good => &["gmail.com", "email.com", "yahoo.com"],
        QualityTier::Fair => &["gmail.com", "yahoo.com"],
        QualityTier::Poor => &["test.com", "example.com"],
    }
}

pub(super) const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];
