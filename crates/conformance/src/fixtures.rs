//! The reference movie dataset.
//!
//! Insertion order matters: the service assigns identities `1..=N` in
//! this order, and ties in the supported orderings fall back to it.
//! Release dates are midnight UTC.

use time::macros::date;
use time::Date;
use verity_model::{Dataset, Record};

type Row = (&'static str, i64, i64, &'static str, Date, bool);

#[rustfmt::skip]
const MOVIES: &[Row] = &[
    ("The Shawshank Redemption", 1994, 142, "R", date!(1994-10-14), false),
    ("The Godfather", 1972, 175, "R", date!(1972-03-24), true),
    ("The Godfather: Part II", 1974, 202, "R", date!(1974-12-20), true),
    ("Pulp Fiction", 1994, 154, "R", date!(1994-10-14), false),
    ("The Good, the Bad and the Ugly", 1966, 161, "R", date!(1967-12-29), false),
    ("12 Angry Men", 1957, 96, "NR", date!(1957-04-13), false),
    ("Schindler's List", 1993, 195, "R", date!(1993-12-15), true),
    ("The Dark Knight", 2008, 152, "PG-13", date!(2008-07-18), false),
    ("The Lord of the Rings: The Return of the King", 2003, 201, "PG-13", date!(2003-12-17), true),
    ("Fight Club", 1999, 139, "R", date!(1999-10-15), false),
    ("Star Wars: Episode V - The Empire Strikes Back", 1980, 124, "PG", date!(1980-05-21), false),
    ("One Flew Over the Cuckoo's Nest", 1975, 133, "R", date!(1975-11-19), true),
    ("The Lord of the Rings: The Fellowship of the Ring", 2001, 178, "PG-13", date!(2001-12-19), false),
    ("Inception", 2010, 148, "PG-13", date!(2010-07-16), false),
    ("Goodfellas", 1990, 146, "R", date!(1990-09-19), false),
    ("Star Wars", 1977, 121, "PG", date!(1977-05-25), false),
    ("Seven Samurai", 1954, 207, "NR", date!(1956-11-19), false),
    ("The Matrix", 1999, 136, "R", date!(1999-03-31), false),
    ("Forrest Gump", 1994, 142, "PG-13", date!(1994-07-06), true),
    ("City of God", 2002, 130, "R", date!(2003-01-17), false),
    ("The Lord of the Rings: The Two Towers", 2002, 179, "PG-13", date!(2002-12-18), false),
    ("Once Upon a Time in the West", 1968, 175, "PG-13", date!(1968-12-21), false),
    ("Se7en", 1995, 127, "R", date!(1995-09-22), false),
    ("The Silence of the Lambs", 1991, 118, "R", date!(1991-02-14), true),
    ("Casablanca", 1942, 102, "PG", date!(1943-01-23), true),
    ("The Usual Suspects", 1995, 106, "R", date!(1995-08-16), false),
    ("Raiders of the Lost Ark", 1981, 115, "PG", date!(1981-06-12), false),
    ("Rear Window", 1954, 112, "PG", date!(1954-09-01), false),
    ("Psycho", 1960, 109, "R", date!(1960-09-08), false),
    ("It's a Wonderful Life", 1946, 130, "PG", date!(1947-01-07), false),
    ("Leon: The Professional", 1994, 110, "R", date!(1994-11-18), false),
    ("Sunset Blvd.", 1950, 110, "NR", date!(1950-08-25), false),
    ("Memento", 2000, 113, "R", date!(2001-05-25), false),
    ("The Dark Knight Rises", 2012, 165, "PG-13", date!(2012-07-20), false),
    ("American History X", 1998, 119, "R", date!(1998-11-20), false),
    ("Apocalypse Now", 1979, 153, "R", date!(1979-08-15), false),
    ("Terminator 2: Judgment Day", 1991, 152, "R", date!(1991-07-03), false),
    ("Dr. Strangelove or: How I Learned to Stop Worrying and Love the Bomb", 1964, 95, "PG", date!(1964-01-29), false),
    ("Saving Private Ryan", 1998, 169, "R", date!(1998-07-24), false),
    ("Alien", 1979, 117, "R", date!(1979-05-25), false),
    ("North by Northwest", 1959, 136, "NR", date!(1959-09-26), false),
    ("City Lights", 1931, 87, "G", date!(1931-03-07), false),
    ("Spirited Away", 2001, 125, "PG", date!(2001-07-20), false),
    ("Citizen Kane", 1941, 119, "PG", date!(1941-09-05), false),
    ("Modern Times", 1936, 87, "G", date!(1936-02-25), false),
    ("The Shining", 1980, 146, "R", date!(1980-05-23), false),
    ("Vertigo", 1958, 129, "PG", date!(1958-07-21), false),
    ("Back to the Future", 1985, 116, "PG", date!(1985-07-03), false),
    ("American Beauty", 1999, 122, "R", date!(1999-10-01), true),
    ("M", 1931, 117, "NR", date!(1931-05-11), false),
    ("The Pianist", 2002, 150, "R", date!(2003-03-28), false),
    ("The Departed", 2006, 151, "R", date!(2006-10-06), true),
    ("Taxi Driver", 1976, 113, "R", date!(1976-02-08), false),
    ("Toy Story 3", 2010, 103, "G", date!(2010-06-18), false),
    ("Paths of Glory", 1957, 88, "NR", date!(1957-10-25), false),
    ("Life Is Beautiful", 1997, 116, "PG-13", date!(1999-02-12), false),
    ("Double Indemnity", 1944, 107, "NR", date!(1944-04-24), false),
    ("Aliens", 1986, 154, "R", date!(1986-07-18), false),
    ("WALL-E", 2008, 98, "G", date!(2008-06-27), false),
    ("The Lives of Others", 2006, 137, "R", date!(2007-03-23), false),
    ("A Clockwork Orange", 1971, 136, "R", date!(1972-02-02), false),
    ("Amelie", 2001, 122, "R", date!(2001-04-24), false),
    ("Gladiator", 2000, 155, "R", date!(2000-05-05), true),
    ("The Green Mile", 1999, 189, "R", date!(1999-12-10), false),
    ("The Intouchables", 2011, 112, "R", date!(2011-11-02), false),
    ("Lawrence of Arabia", 1962, 216, "PG", date!(1962-12-11), true),
    ("To Kill a Mockingbird", 1962, 129, "NR", date!(1963-03-16), false),
    ("The Prestige", 2006, 130, "PG-13", date!(2006-10-20), false),
    ("The Great Dictator", 1940, 125, "G", date!(1941-03-07), false),
    ("Reservoir Dogs", 1992, 99, "R", date!(1992-10-23), false),
    ("Das Boot", 1981, 149, "R", date!(1982-02-10), false),
    ("Requiem for a Dream", 2000, 102, "NC-17", date!(2000-10-27), false),
    ("The Third Man", 1949, 93, "NR", date!(1949-08-31), false),
    ("The Treasure of the Sierra Madre", 1948, 126, "NR", date!(1948-01-24), false),
    ("Eternal Sunshine of the Spotless Mind", 2004, 108, "R", date!(2004-03-19), false),
    ("Cinema Paradiso", 1988, 155, "PG", date!(1990-02-23), false),
    ("Once Upon a Time in America", 1984, 229, "R", date!(1984-05-23), false),
    ("Chinatown", 1974, 130, "R", date!(1974-06-20), false),
    ("L.A. Confidential", 1997, 138, "R", date!(1997-09-19), false),
    ("The Lion King", 1994, 89, "G", date!(1994-06-24), false),
    ("Star Wars: Episode VI - Return of the Jedi", 1983, 134, "PG", date!(1983-05-25), false),
    ("Full Metal Jacket", 1987, 116, "R", date!(1987-06-26), false),
    ("Raging Bull", 1980, 129, "R", date!(1980-12-19), false),
    ("Oldboy", 2003, 120, "R", date!(2003-11-21), false),
    ("M*A*S*H", 1970, 116, "R", date!(1970-01-25), false),
    ("Patton", 1970, 172, "PG", date!(1970-04-02), true),
    ("Gone with the Wind", 1939, 238, "G", date!(1940-01-17), true),
    ("Ben-Hur", 1959, 212, "G", date!(1959-11-18), true),
    ("The Sound of Music", 1965, 174, "G", date!(1965-03-02), true),
    ("The Apartment", 1960, 125, "NR", date!(1960-06-15), true),
    ("On the Waterfront", 1954, 108, "NR", date!(1954-07-28), true),
    ("All About Eve", 1950, 138, "NR", date!(1950-11-09), true),
    ("Rebecca", 1940, 130, "NR", date!(1940-04-12), true),
    ("How Green Was My Valley", 1941, 118, "NR", date!(1941-10-28), true),
    ("The Best Years of Our Lives", 1946, 170, "NR", date!(1946-11-21), true),
    ("All Quiet on the Western Front", 1930, 136, "NR", date!(1930-04-21), true),
    ("It Happened One Night", 1934, 105, "NR", date!(1934-02-22), true),
    ("The Sting", 1973, 129, "PG", date!(1973-12-25), true),
    ("Rocky", 1976, 120, "PG", date!(1976-11-21), true),
    ("Annie Hall", 1977, 93, "PG", date!(1977-04-20), true),
    ("The Deer Hunter", 1978, 183, "R", date!(1978-12-08), true),
    ("Kramer vs. Kramer", 1979, 105, "PG", date!(1979-12-19), true),
    ("Ordinary People", 1980, 124, "R", date!(1980-09-19), true),
    ("Gandhi", 1982, 191, "PG", date!(1982-12-08), true),
    ("Amadeus", 1984, 160, "R", date!(1984-09-19), true),
    ("Out of Africa", 1985, 161, "PG", date!(1985-12-20), true),
    ("Platoon", 1986, 120, "R", date!(1986-12-19), true),
    ("The Last Emperor", 1987, 150, "PG-13", date!(1987-11-20), true),
    ("Rain Man", 1988, 133, "R", date!(1988-12-16), true),
    ("Dances with Wolves", 1990, 181, "PG-13", date!(1990-11-21), true),
    ("Unforgiven", 1992, 130, "R", date!(1992-08-07), true),
    ("Braveheart", 1995, 177, "R", date!(1995-05-24), true),
    ("Titanic", 1997, 194, "PG-13", date!(1997-12-19), true),
    ("A Beautiful Mind", 2001, 135, "PG-13", date!(2001-12-21), true),
    ("Chicago", 2002, 113, "PG-13", date!(2002-12-27), true),
    ("Million Dollar Baby", 2004, 132, "PG-13", date!(2004-12-15), true),
    ("No Country for Old Men", 2007, 122, "R", date!(2007-11-21), true),
    ("Slumdog Millionaire", 2008, 120, "R", date!(2008-11-12), true),
    ("The King's Speech", 2010, 118, "R", date!(2010-12-24), true),
    ("The Artist", 2011, 100, "PG-13", date!(2011-10-12), true),
    ("Argo", 2012, 120, "R", date!(2012-10-12), true),
    ("12 Years a Slave", 2013, 134, "R", date!(2013-11-08), true),
    ("Birdman", 2014, 119, "R", date!(2014-10-17), true),
    ("Spotlight", 2015, 129, "R", date!(2015-11-06), true),
    ("Moonlight", 2016, 111, "R", date!(2016-10-21), true),
    ("The Shape of Water", 2017, 123, "R", date!(2017-12-22), true),
    ("Green Book", 2018, 130, "PG-13", date!(2018-11-16), true),
    ("Parasite", 2019, 132, "R", date!(2019-05-30), true),
];

/// The full reference dataset, in insertion order.
pub fn movies() -> Dataset {
    MOVIES
        .iter()
        .map(|&(title, year, duration, rating, released, winner)| Record {
            id: None,
            title: title.to_string(),
            year,
            duration,
            rating: rating.to_string(),
            release_date: released.midnight().assume_utc(),
            best_picture_winner: winner,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn titles_are_unique() {
        let data = movies();
        let titles: HashSet<&str> = data.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles.len(), data.len());
    }

    #[test]
    fn at_most_one_winner_per_year() {
        let data = movies();
        let winners: Vec<i64> = data
            .iter()
            .filter(|m| m.best_picture_winner)
            .map(|m| m.year)
            .collect();
        let distinct: HashSet<i64> = winners.iter().copied().collect();
        assert_eq!(distinct.len(), winners.len());
    }

    #[test]
    fn shared_release_date() {
        let data = movies();
        let same_day: Vec<&str> = data
            .iter()
            .filter(|m| m.release_date.date() == date!(1994-10-14))
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(same_day, vec!["The Shawshank Redemption", "Pulp Fiction"]);
    }

    #[test]
    fn fits_in_one_page() {
        assert!(movies().len() < 500);
    }
}
