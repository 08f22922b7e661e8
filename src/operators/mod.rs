//! Pure transformations over a loaded [`RecordSet`](crate::model::RecordSet):
//! filtering, grouped counts, random sampling and term frequencies.

pub mod aggregate;
pub mod filter;
pub mod sampler;
pub mod stopwords;
pub mod term_frequency;

pub use aggregate::{
    count_by_airline_sentiment, count_by_sentiment, AirlineSentimentCount, AirlineSentimentCounts,
    SentimentCount, SentimentCounts,
};
pub use filter::{Predicate, Selection};
pub use sampler::{rng_from_seed, sample_one};
pub use stopwords::{Stopwords, STANDARD_STOPWORDS};
pub use term_frequency::{is_noise_token, TermFrequencyPipeline, TermFrequencyTable, TermWeight};
